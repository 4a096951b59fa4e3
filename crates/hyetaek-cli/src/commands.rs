//! One-shot command handlers.
//!
//! Each handler builds an [`App`] over the on-disk data directory, performs a
//! single interaction and prints the outcome. Commands that only touch local
//! data (history, favorites toggle, receipts) skip catalog seeding.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use hyetaek_app::{App, FileStore, IpLocator, LocationSource, Persistence, PositionOptions};
use hyetaek_core::{AppConfig, CategoryFilter, Coordinate};
use hyetaek_gemini::{DiscountGateway, GeminiClient};

use crate::render;

/// Builds the controller from configuration.
///
/// `fixed` overrides IP geolocation with a user-supplied coordinate.
///
/// # Errors
///
/// Returns an error if the catalog file is invalid or an HTTP client cannot be
/// constructed.
pub(crate) fn build_app(
    config: &AppConfig,
    fixed: Option<(f64, f64)>,
) -> anyhow::Result<App<FileStore>> {
    let catalog = hyetaek_core::load_catalog_or_default(&config.catalog_path)
        .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

    let client = GeminiClient::with_base_url(
        &config.gemini_api_key,
        &config.gemini_model,
        config.request_timeout_secs,
        &config.user_agent,
        &config.gemini_base_url,
    )?;

    let location = match fixed {
        Some((lat, lon)) => LocationSource::Fixed(Coordinate::new(lat, lon)),
        None => LocationSource::IpLookup(IpLocator::new(
            &config.geolocation_url,
            &config.user_agent,
        )?),
    };

    let options = PositionOptions {
        timeout: Duration::from_secs(config.geolocation_timeout_secs),
        ..PositionOptions::default()
    };

    Ok(App::new(
        DiscountGateway::new(client, catalog),
        Persistence::new(FileStore::new(&config.data_dir)),
        location,
        options,
    ))
}

fn print_notification(app: &App<FileStore>) {
    if let Some(notification) = &app.state().notification {
        println!("{}", render::notification(notification));
    }
}

/// Seed the catalog and list stores after filtering.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) async fn run_stores(
    config: &AppConfig,
    category: Option<CategoryFilter>,
    search: Option<&str>,
    nearby: bool,
    fixed: Option<(f64, f64)>,
) -> anyhow::Result<()> {
    let mut app = build_app(config, fixed)?;
    app.load().await;
    print_notification(&app);

    if let Some(category) = category {
        app.set_category(category);
    }
    if let Some(term) = search {
        app.set_search(term);
    }
    if nearby || fixed.is_some() {
        app.toggle_nearby().await;
        print_notification(&app);
    }

    println!("{}", render::store_table(&app.visible_stores(), app.state()));
    Ok(())
}

/// Recommend stores for free-text preferences.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) async fn run_recommend(config: &AppConfig, preferences: &str) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.load().await;
    if app.state().stores.is_empty() {
        print_notification(&app);
        return Ok(());
    }

    app.recommend(preferences).await;
    print_notification(&app);
    for store in &app.state().recommendations {
        println!("{}\n", render::store_detail(store, None));
    }
    Ok(())
}

/// Parse receipt text and save it to history.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) async fn run_receipt_text(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.hydrate();

    let before = app.state().receipt_history.len();
    app.submit_text_receipt(text).await;
    print_notification(&app);
    if app.state().receipt_history.len() > before {
        println!("{}", render::receipt_table(&app.state().receipt_history[..1]));
    }
    Ok(())
}

/// Analyze a receipt image, optionally saving the result.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) async fn run_receipt_image(
    config: &AppConfig,
    path: &Path,
    save: bool,
) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.hydrate();

    app.select_receipt_image_path(path);
    if app.state().analysis.image.is_none() {
        print_notification(&app);
        return Ok(());
    }

    app.analyze_selected_image().await;
    print_notification(&app);
    let Some(result) = &app.state().analysis.result else {
        return Ok(());
    };
    println!("{}", render::analysis(result));

    if save {
        app.save_analyzed_receipt();
        print_notification(&app);
    }
    Ok(())
}

/// Print saved receipts.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) fn run_history(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.hydrate();

    let history = &app.state().receipt_history;
    if history.is_empty() {
        println!("no receipts saved yet; run `receipt text` or `receipt image --save` first");
        return Ok(());
    }
    println!("{}", render::receipt_table(history));
    Ok(())
}

/// Seed the catalog and print favorited stores present in it.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) async fn run_favorites_list(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.load().await;

    let favorites = app.favorite_stores();
    let saved = app.state().favorites.len();
    if favorites.is_empty() {
        println!("no favorited stores in the current catalog ({saved} saved ids)");
        return Ok(());
    }
    for store in &favorites {
        println!("{}\n", render::store_detail(store, None));
    }
    if saved > favorites.len() {
        println!("{} saved ids are not in the current catalog", saved - favorites.len());
    }
    Ok(())
}

/// Add or remove a store id from favorites.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed.
pub(crate) fn run_favorites_toggle(config: &AppConfig, store_id: &str) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    app.hydrate();
    app.toggle_favorite(store_id);
    print_notification(&app);
    Ok(())
}
