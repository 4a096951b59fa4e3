use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::geo::Coordinate;

/// One offer tied to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountInfo {
    pub id: String,
    pub description: String,
    pub conditions: String,
}

/// A partner store and its discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub discounts: Vec<DiscountInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 0–5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
}

impl Store {
    /// The store's position, when both latitude and longitude are known.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Case-insensitive match against name, address and discount descriptions.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self
                .discounts
                .iter()
                .any(|d| d.description.to_lowercase().contains(needle))
    }
}
