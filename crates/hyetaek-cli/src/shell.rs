//! Interactive session: the catalog is seeded once and every line read from
//! stdin becomes one interaction against the same [`App`].

use std::path::PathBuf;

use hyetaek_app::{App, FileStore, View};
use hyetaek_core::{AppConfig, CategoryFilter, APP_TITLE};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::build_app;
use crate::render;

const HELP: &str = "\
commands:
  list                    show stores with the current filters
  category <label|all>    filter by category (음식, 문화, 뷰티/건강, 스터디, 쇼핑, 기타)
  search [term]           filter by text; no term clears the search
  near | far              turn nearby sorting on or off
  show <store-id>         store details
  fav <store-id>          add or remove a favorite
  favs                    list favorite stores
  recommend <text>        AI recommendation from preferences
  receipt <text>          save a receipt from typed text
  analyze <image-path>    analyze a receipt image
  save                    save the last analyzed receipt
  close                   close the receipt analysis session
  history                 saved receipts
  reset                   clear category and search
  help | quit";

#[derive(Debug, PartialEq)]
pub(crate) enum ShellCommand {
    List,
    Category(CategoryFilter),
    Search(String),
    Near,
    Far,
    Show(String),
    Favorite(String),
    Favorites,
    Recommend(String),
    Receipt(String),
    Analyze(PathBuf),
    Save,
    Close,
    History,
    Reset,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Parses one input line. Arguments keep their inner whitespace.
pub(crate) fn parse_shell_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(h, r)| (h, r.trim()));

    let needs_arg = |cmd: fn(String) -> ShellCommand| {
        if rest.is_empty() {
            ShellCommand::Invalid(format!("`{head}` needs an argument"))
        } else {
            cmd(rest.to_string())
        }
    };

    match head.to_lowercase().as_str() {
        "list" | "ls" => ShellCommand::List,
        "category" | "cat" => match CategoryFilter::parse(rest) {
            Some(filter) => ShellCommand::Category(filter),
            None => ShellCommand::Invalid(format!("unknown category '{rest}'")),
        },
        "search" => ShellCommand::Search(rest.to_string()),
        "near" => ShellCommand::Near,
        "far" => ShellCommand::Far,
        "show" => needs_arg(ShellCommand::Show),
        "fav" => needs_arg(ShellCommand::Favorite),
        "favs" | "favorites" => ShellCommand::Favorites,
        "recommend" | "rec" => needs_arg(ShellCommand::Recommend),
        "receipt" => needs_arg(ShellCommand::Receipt),
        "analyze" => needs_arg(|p| ShellCommand::Analyze(PathBuf::from(p))),
        "save" => ShellCommand::Save,
        "close" => ShellCommand::Close,
        "history" => ShellCommand::History,
        "reset" => ShellCommand::Reset,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command '{other}'; try `help`")),
    }
}

fn print_notification(app: &App<FileStore>, last_seen: &mut u64) {
    if let Some(n) = &app.state().notification {
        if n.id != *last_seen {
            *last_seen = n.id;
            println!("{}", render::notification(n));
        }
    }
}

/// Runs the interactive loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if the app cannot be constructed or stdin fails.
pub(crate) async fn run_shell(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = build_app(config, None)?;
    let mut last_seen = 0;

    println!("{APP_TITLE}: loading discounts...");
    app.load().await;
    print_notification(&app, &mut last_seen);
    println!("{} stores loaded. type `help` for commands.", app.state().stores.len());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_shell_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Invalid(message) => println!("{message}"),
            ShellCommand::List => {
                println!("{}", render::store_table(&app.visible_stores(), app.state()));
            }
            ShellCommand::Category(filter) => {
                app.set_category(filter);
                println!("{} stores", app.visible_stores().len());
            }
            ShellCommand::Search(term) => {
                app.set_search(&term);
                println!("{} stores", app.visible_stores().len());
            }
            ShellCommand::Near => {
                if app.state().filter.proximity.active {
                    println!("nearby mode is already on");
                } else {
                    app.toggle_nearby().await;
                }
            }
            ShellCommand::Far => {
                if app.state().filter.proximity.active {
                    app.toggle_nearby().await;
                } else {
                    println!("nearby mode is already off");
                }
            }
            ShellCommand::Show(id) => {
                let row = app
                    .visible_stores()
                    .into_iter()
                    .find(|r| r.store.id == id);
                match (row, app.state().store(&id)) {
                    (Some(row), _) => {
                        println!("{}", render::store_detail(&row.store, row.distance_km));
                    }
                    (None, Some(store)) => println!("{}", render::store_detail(store, None)),
                    (None, None) => println!("no store with id '{id}'"),
                }
                if app.state().store(&id).is_some() {
                    app.open_view(View::StoreDetails(id));
                }
            }
            ShellCommand::Favorite(id) => app.toggle_favorite(&id),
            ShellCommand::Favorites => {
                let favorites = app.favorite_stores();
                if favorites.is_empty() {
                    println!("no favorites yet");
                }
                for store in &favorites {
                    println!("{}\n", render::store_detail(store, None));
                }
            }
            ShellCommand::Recommend(preferences) => {
                app.open_view(View::AiRecommender);
                app.recommend(&preferences).await;
                for store in &app.state().recommendations {
                    println!("{}\n", render::store_detail(store, None));
                }
                app.close_view();
            }
            ShellCommand::Receipt(text) => {
                app.open_view(View::TextReceipt);
                app.submit_text_receipt(&text).await;
                app.close_view();
            }
            ShellCommand::Analyze(path) => {
                app.open_view(View::ReceiptAnalysis);
                app.select_receipt_image_path(&path);
                if app.state().analysis.image.is_some() {
                    app.analyze_selected_image().await;
                    if let Some(result) = &app.state().analysis.result {
                        println!("{}", render::analysis(result));
                        println!("type `save` to store this receipt, `close` to discard it");
                    }
                }
            }
            ShellCommand::Save => {
                if app.state().analysis.result.is_none() {
                    println!("nothing to save; run `analyze <image-path>` first");
                } else if app.state().analysis.saved {
                    println!("already saved");
                } else {
                    app.save_analyzed_receipt();
                }
            }
            ShellCommand::Close => app.close_view(),
            ShellCommand::History => {
                if app.state().receipt_history.is_empty() {
                    println!("no receipts saved yet");
                } else {
                    println!("{}", render::receipt_table(&app.state().receipt_history));
                }
            }
            ShellCommand::Reset => app.explore(),
        }
        print_notification(&app, &mut last_seen);
    }

    Ok(())
}
