mod commands;
mod render;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hyetaek_core::CategoryFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hyetaek")]
#[command(about = "혜택:ON student discount discovery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed the catalog and list stores
    Stores {
        /// Category label or key (e.g. 음식, study); `all` for every category
        #[arg(long, value_parser = parse_category)]
        category: Option<CategoryFilter>,
        /// Case-insensitive search over name, address and discounts
        #[arg(long)]
        search: Option<String>,
        /// Sort by distance from the current location
        #[arg(long)]
        nearby: bool,
        /// Latitude to use instead of IP geolocation
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude to use instead of IP geolocation
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },
    /// Recommend stores matching free-text preferences
    Recommend { preferences: String },
    /// Analyze a receipt
    Receipt {
        #[command(subcommand)]
        command: ReceiptCommands,
    },
    /// Show saved receipts, most recent first
    History,
    /// Manage favorite stores
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// Interactive session over one seeded catalog
    Shell,
}

#[derive(Debug, Subcommand)]
enum ReceiptCommands {
    /// Extract a receipt from typed text and save it to history
    Text { text: String },
    /// Analyze a receipt image and suggest benefits
    Image {
        path: PathBuf,
        /// Save the analyzed receipt to history
        #[arg(long)]
        save: bool,
    },
}

#[derive(Debug, Subcommand)]
enum FavoritesCommands {
    List,
    Toggle { store_id: String },
}

fn parse_category(raw: &str) -> Result<CategoryFilter, String> {
    CategoryFilter::parse(raw).ok_or_else(|| {
        format!(
            "unknown category '{raw}'; expected all or one of {}",
            hyetaek_core::Category::joined_labels(", ")
        )
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = hyetaek_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, model = %config.gemini_model, "configuration loaded");

    match cli.command {
        Some(Commands::Stores {
            category,
            search,
            nearby,
            lat,
            lon,
        }) => {
            let fixed = lat.zip(lon);
            commands::run_stores(&config, category, search.as_deref(), nearby, fixed).await?;
        }
        Some(Commands::Recommend { preferences }) => {
            commands::run_recommend(&config, &preferences).await?;
        }
        Some(Commands::Receipt { command }) => match command {
            ReceiptCommands::Text { text } => commands::run_receipt_text(&config, &text).await?,
            ReceiptCommands::Image { path, save } => {
                commands::run_receipt_image(&config, &path, save).await?;
            }
        },
        Some(Commands::History) => commands::run_history(&config)?,
        Some(Commands::Favorites { command }) => match command {
            FavoritesCommands::List => commands::run_favorites_list(&config).await?,
            FavoritesCommands::Toggle { store_id } => {
                commands::run_favorites_toggle(&config, &store_id)?;
            }
        },
        Some(Commands::Shell) | None => shell::run_shell(&config).await?,
    }

    Ok(())
}
