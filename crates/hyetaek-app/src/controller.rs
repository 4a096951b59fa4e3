//! Async controller tying state, the AI gateway, storage and location together.
//!
//! Each public method mirrors one user interaction. Input validation happens
//! before any request is sent; every response goes back through [`reduce`]
//! as an [`Action`], and persisted collections are rewritten whenever a
//! reduction changes them.

use std::path::Path;

use hyetaek_core::CategoryFilter;
use hyetaek_gemini::DiscountGateway;
use uuid::Uuid;

use crate::filter::RankedStore;
use crate::geolocation::{LocationSource, PositionOptions};
use crate::inflight::{Feature, RequestToken};
use crate::persistence::{KeyValueStore, Persistence};
use crate::receipt_image::ReceiptImage;
use crate::state::{
    reduce, Action, AppState, NotificationKind, View, MSG_IMAGE_REQUIRED,
    MSG_PREFERENCES_REQUIRED, MSG_RECEIPT_TEXT_REQUIRED,
};

pub struct App<S> {
    state: AppState,
    gateway: DiscountGateway,
    persistence: Persistence<S>,
    location: LocationSource,
    position_options: PositionOptions,
}

impl<S: KeyValueStore> App<S> {
    #[must_use]
    pub fn new(
        gateway: DiscountGateway,
        persistence: Persistence<S>,
        location: LocationSource,
        position_options: PositionOptions,
    ) -> Self {
        Self {
            state: AppState::default(),
            gateway,
            persistence,
            location,
            position_options,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Reduces `action` and writes back any persisted collection it changed.
    pub fn dispatch(&mut self, action: Action) {
        let favorites_before = self.state.favorites.clone();
        let history_before = self.state.receipt_history.clone();

        self.apply(action);

        if self.state.favorites != favorites_before {
            if let Err(e) = self.persistence.save_favorites(&self.state.favorites) {
                tracing::error!(error = %e, "failed to persist favorites");
            }
        }
        if self.state.receipt_history != history_before {
            if let Err(e) = self.persistence.save_history(&self.state.receipt_history) {
                tracing::error!(error = %e, "failed to persist receipt history");
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.dispatch(Action::Notify {
            message: message.to_string(),
            kind,
        });
    }

    fn start(&mut self, feature: Feature) -> Option<RequestToken> {
        self.dispatch(Action::RequestStarted(feature));
        self.state.inflight.current(feature)
    }

    /// Reads favorites and receipt history from storage. A collection that
    /// cannot be read starts empty.
    pub fn hydrate(&mut self) {
        let favorites = self.persistence.load_favorites().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored favorites");
            Vec::new()
        });
        let receipt_history = self.persistence.load_history().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored receipt history");
            Vec::new()
        });
        tracing::info!(
            favorites = favorites.len(),
            receipts = receipt_history.len(),
            "hydrated local data"
        );
        self.apply(Action::Hydrated {
            favorites,
            receipt_history,
        });
    }

    /// Hydrates local data, then seeds the store catalog.
    pub async fn load(&mut self) {
        self.hydrate();
        self.dispatch(Action::CatalogRequested);
        let stores = self.gateway.fetch_initial_discounts().await;
        self.dispatch(Action::StoresLoaded(stores));
    }

    /// Recommends stores for `preferences` from the full catalog.
    pub async fn recommend(&mut self, preferences: &str) {
        if preferences.trim().is_empty() {
            self.notify(MSG_PREFERENCES_REQUIRED, NotificationKind::Info);
            return;
        }
        let Some(token) = self.start(Feature::Recommendation) else {
            return;
        };
        let stores = self.gateway.recommend(preferences, &self.state.stores).await;
        self.dispatch(Action::RecommendationsReceived { token, stores });
    }

    /// Parses free receipt text and, on success, prepends it to history.
    pub async fn submit_text_receipt(&mut self, receipt_text: &str) {
        if receipt_text.trim().is_empty() {
            self.notify(MSG_RECEIPT_TEXT_REQUIRED, NotificationKind::Info);
            return;
        }
        let Some(token) = self.start(Feature::TextReceipt) else {
            return;
        };
        let receipt = self.gateway.analyze_receipt_text(receipt_text).await;
        self.dispatch(Action::TextReceiptParsed { token, receipt });
    }

    /// Selects `image` for analysis. Non-images are rejected with a
    /// notification and leave the session untouched.
    pub fn select_receipt_image(&mut self, image: ReceiptImage) {
        match image.validate() {
            Ok(()) => self.dispatch(Action::ImageSelected(image)),
            Err(e) => {
                tracing::info!(error = %e, "rejected receipt image");
                self.dispatch(Action::ImageRejected(e.user_message().to_string()));
            }
        }
    }

    /// Like [`App::select_receipt_image`], reading the file first.
    pub fn select_receipt_image_path(&mut self, path: &Path) {
        match ReceiptImage::from_path(path) {
            Ok(image) => self.select_receipt_image(image),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load receipt image");
                self.dispatch(Action::ImageRejected(e.user_message().to_string()));
            }
        }
    }

    /// Sends the selected image for analysis and benefit suggestions.
    pub async fn analyze_selected_image(&mut self) {
        if self.state.analysis.image.is_none() {
            self.notify(MSG_IMAGE_REQUIRED, NotificationKind::Info);
            return;
        }
        let Some(token) = self.start(Feature::ImageReceipt) else {
            return;
        };
        let result = match &self.state.analysis.image {
            Some(image) => {
                self.gateway
                    .analyze_receipt_image(&image.media_type, &image.bytes)
                    .await
            }
            None => None,
        };
        self.dispatch(Action::ReceiptAnalyzed { token, result });
    }

    /// Saves the analyzed receipt unless the same purchase is already stored.
    pub fn save_analyzed_receipt(&mut self) {
        self.dispatch(Action::SaveAnalyzedReceipt {
            receipt_id: Uuid::new_v4().to_string(),
        });
    }

    pub fn toggle_favorite(&mut self, store_id: &str) {
        self.dispatch(Action::ToggleFavorite(store_id.to_string()));
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.dispatch(Action::SelectCategory(category));
    }

    pub fn set_search(&mut self, term: &str) {
        self.dispatch(Action::SetSearch(term.to_string()));
    }

    pub fn explore(&mut self) {
        self.dispatch(Action::Explore);
    }

    /// Turns nearby mode off, or locates the device and turns it on.
    pub async fn toggle_nearby(&mut self) {
        if self.state.filter.proximity.active {
            self.dispatch(Action::ProximityDisabled);
            return;
        }

        self.dispatch(Action::LocationRequested);
        match self.location.locate(&self.position_options).await {
            Ok(coordinate) => {
                tracing::info!(%coordinate, "device located");
                self.dispatch(Action::LocationAcquired(coordinate));
            }
            Err(e) => {
                tracing::warn!(error = %e, "device location failed");
                self.dispatch(Action::LocationFailed(e.user_message()));
            }
        }
    }

    pub fn open_view(&mut self, view: View) {
        self.dispatch(Action::OpenView(view));
    }

    pub fn close_view(&mut self) {
        self.dispatch(Action::CloseView);
    }

    #[must_use]
    pub fn visible_stores(&self) -> Vec<RankedStore> {
        self.state.visible_stores()
    }

    #[must_use]
    pub fn favorite_stores(&self) -> Vec<hyetaek_core::Store> {
        self.state.favorite_stores()
    }
}
