//! Filter and sort pipeline behind the store list.

use hyetaek_core::{haversine_km, CategoryFilter, Coordinate, Store};

/// Nearby-mode inputs. Distances are only computed when `active` is set and
/// a device coordinate is known.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Proximity {
    pub active: bool,
    pub device: Option<Coordinate>,
}

impl Proximity {
    fn origin(self) -> Option<Coordinate> {
        if self.active {
            self.device
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterInputs {
    pub category: CategoryFilter,
    pub search: String,
    pub proximity: Proximity,
}

/// A store paired with its distance from the device, when nearby mode ranked it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStore {
    pub store: Store,
    /// `Some(f64::INFINITY)` for stores without a coordinate while ranking.
    pub distance_km: Option<f64>,
}

impl RankedStore {
    /// Finite distance, if any.
    #[must_use]
    pub fn known_distance_km(&self) -> Option<f64> {
        self.distance_km.filter(|d| d.is_finite())
    }
}

/// Applies category, search and proximity to `stores`.
///
/// Without an active proximity origin the input order is preserved. With one,
/// the result is stably sorted by ascending distance and stores lacking a
/// coordinate sink to the end.
#[must_use]
pub fn filter_stores(stores: &[Store], inputs: &FilterInputs) -> Vec<RankedStore> {
    let needle = inputs.search.to_lowercase();

    let kept = stores
        .iter()
        .filter(|s| inputs.category.matches(s.category))
        .filter(|s| needle.is_empty() || s.matches_search(&needle));

    let Some(origin) = inputs.proximity.origin() else {
        return kept
            .map(|store| RankedStore {
                store: store.clone(),
                distance_km: None,
            })
            .collect();
    };

    let mut ranked: Vec<RankedStore> = kept
        .map(|store| RankedStore {
            store: store.clone(),
            distance_km: Some(
                store
                    .coordinate()
                    .map_or(f64::INFINITY, |c| haversine_km(origin, c)),
            ),
        })
        .collect();

    // `sort_by` is stable, so equal distances keep catalog order.
    ranked.sort_by(|a, b| {
        let x = a.distance_km.unwrap_or(f64::INFINITY);
        let y = b.distance_km.unwrap_or(f64::INFINITY);
        x.total_cmp(&y)
    });
    ranked
}
