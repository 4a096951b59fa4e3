use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ConfigError;

/// Parameters of the catalog-seeding prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Area the generated stores are spread across, e.g. `서울`.
    pub region: String,
    pub min_stores: u32,
    pub max_stores: u32,
    /// How many stores a preference-based recommendation returns.
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: u32,
    /// Categories to seed. Empty means every category.
    #[serde(default)]
    pub categories: Vec<Category>,
}

fn default_recommendation_count() -> u32 {
    3
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            region: "서울".to_string(),
            min_stores: 10,
            max_stores: 15,
            recommendation_count: default_recommendation_count(),
            categories: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Categories the seed prompt should cover.
    #[must_use]
    pub fn seeded_categories(&self) -> Vec<Category> {
        if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            self.categories.clone()
        }
    }
}

/// Load and validate the catalog configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogConfig =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

/// Like [`load_catalog`], but a missing file yields [`CatalogConfig::default`].
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or validated.
pub fn load_catalog_or_default(path: &Path) -> Result<CatalogConfig, ConfigError> {
    if path.exists() {
        load_catalog(path)
    } else {
        Ok(CatalogConfig::default())
    }
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.region.trim().is_empty() {
        return Err(ConfigError::Validation(
            "catalog region must be non-empty".to_string(),
        ));
    }

    if catalog.min_stores == 0 || catalog.min_stores > catalog.max_stores {
        return Err(ConfigError::Validation(format!(
            "invalid store range {}..={}; need 1 <= min_stores <= max_stores",
            catalog.min_stores, catalog.max_stores
        )));
    }

    if catalog.recommendation_count == 0 {
        return Err(ConfigError::Validation(
            "recommendation_count must be at least 1".to_string(),
        ));
    }

    Ok(())
}
