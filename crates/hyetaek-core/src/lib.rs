pub mod app_config;
pub mod catalog;
pub mod category;
pub mod config;
pub mod geo;
pub mod receipts;
pub mod stores;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{load_catalog, load_catalog_or_default, CatalogConfig};
pub use category::{Category, CategoryFilter};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_km, Coordinate, EARTH_RADIUS_KM};
pub use receipts::{AnalyzedReceipt, ReceiptAnalysisResult, ReceiptData, SuggestedDiscount};
pub use stores::{DiscountInfo, Store};

/// Label written into `discountApplied` when a receipt shows no discount.
pub const NO_DISCOUNT_LABEL: &str = "없음";

/// Product name shown in CLI banners and user agents.
pub const APP_TITLE: &str = "혜택:ON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
