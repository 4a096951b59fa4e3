//! Application state and the pure reducer that evolves it.
//!
//! Every user interaction and every settled request becomes an [`Action`].
//! [`reduce`] takes the current state by value and returns the next one; it
//! performs no I/O. Ids the reducer needs (notification sequence, new receipt
//! ids) are either derived from state or carried in the action.

use hyetaek_core::{
    CategoryFilter, Coordinate, ReceiptAnalysisResult, ReceiptData, Store,
};

use crate::filter::{filter_stores, FilterInputs, RankedStore};
use crate::inflight::{Feature, InFlight, RequestToken};
use crate::receipt_image::ReceiptImage;

pub const MSG_CATALOG_LOADED: &str = "할인 정보를 성공적으로 불러왔습니다!";
pub const MSG_CATALOG_EMPTY: &str = "초기 할인 정보를 불러오지 못했습니다.";
pub const MSG_PREFERENCES_REQUIRED: &str = "추천을 받으려면 원하는 내용을 입력해주세요.";
pub const MSG_RECOMMENDED: &str = "AI 추천을 생성했습니다!";
pub const MSG_NO_RECOMMENDATION: &str = "AI가 현재 조건에 맞는 추천을 찾지 못했습니다.";
pub const MSG_RECEIPT_TEXT_REQUIRED: &str = "영수증 내용을 입력해주세요.";
pub const MSG_TEXT_RECEIPT_SAVED: &str = "영수증이 성공적으로 분석되어 등록되었습니다.";
pub const MSG_TEXT_RECEIPT_FAILED: &str = "영수증 분석에 실패했습니다. 입력 내용을 확인해주세요.";
pub const MSG_IMAGE_REQUIRED: &str = "분석할 영수증 이미지 파일을 선택해주세요.";
pub const MSG_IMAGE_ANALYZED: &str = "영수증 분석 및 할인 추천이 완료되었습니다.";
pub const MSG_IMAGE_FAILED: &str =
    "영수증 분석에 실패했습니다. 이미지 품질을 확인하거나 다시 시도해주세요.";
pub const MSG_DUPLICATE_RECEIPT: &str = "이미 내역에 저장된 영수증입니다.";
pub const MSG_ANALYZED_RECEIPT_SAVED: &str = "분석된 영수증이 내역에 저장되었습니다.";
pub const MSG_FAVORITE_REMOVED: &str = "찜 목록에서 삭제되었습니다.";
pub const MSG_FAVORITE_ADDED: &str = "찜 목록에 추가되었습니다!";
pub const MSG_NEARBY_OFF: &str = "주변 검색 모드가 해제되었습니다.";
pub const MSG_NEARBY_ON: &str = "사용자 위치를 확인했습니다. 주변 혜택을 정렬합니다.";

/// The overlay currently open on top of the store list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    StoreDetails(String),
    AiRecommender,
    TextReceipt,
    ReceiptHistory,
    Favorites,
    ReceiptAnalysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
}

/// The receipt-image flow: selected file, model result, and whether the
/// result has been written to history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSession {
    pub image: Option<ReceiptImage>,
    pub result: Option<ReceiptAnalysisResult>,
    pub saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub stores: Vec<Store>,
    pub catalog_loading: bool,
    pub filter: FilterInputs,
    pub favorites: Vec<String>,
    /// Most recent first.
    pub receipt_history: Vec<ReceiptData>,
    pub recommendations: Vec<Store>,
    pub analysis: AnalysisSession,
    pub view: Option<View>,
    pub location_loading: bool,
    pub location_error: Option<String>,
    pub notification: Option<Notification>,
    pub inflight: InFlight,
    notification_seq: u64,
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Persisted collections read at startup.
    Hydrated {
        favorites: Vec<String>,
        receipt_history: Vec<ReceiptData>,
    },
    CatalogRequested,
    StoresLoaded(Vec<Store>),
    SelectCategory(CategoryFilter),
    SetSearch(String),
    /// Back to the plain list: closes any view and clears category and search.
    Explore,
    LocationRequested,
    LocationAcquired(Coordinate),
    /// Carries the user-facing message.
    LocationFailed(String),
    ProximityDisabled,
    ToggleFavorite(String),
    RequestStarted(Feature),
    RecommendationsReceived {
        token: RequestToken,
        stores: Vec<Store>,
    },
    TextReceiptParsed {
        token: RequestToken,
        receipt: Option<ReceiptData>,
    },
    ImageSelected(ReceiptImage),
    ImageRejected(String),
    ReceiptAnalyzed {
        token: RequestToken,
        result: Option<ReceiptAnalysisResult>,
    },
    SaveAnalyzedReceipt {
        receipt_id: String,
    },
    OpenView(View),
    CloseView,
    Notify {
        message: String,
        kind: NotificationKind,
    },
}

impl AppState {
    /// Stores after category, search and proximity are applied.
    #[must_use]
    pub fn visible_stores(&self) -> Vec<RankedStore> {
        filter_stores(&self.stores, &self.filter)
    }

    /// Favorited stores still present in the catalog, in catalog order.
    #[must_use]
    pub fn favorite_stores(&self) -> Vec<Store> {
        self.stores
            .iter()
            .filter(|s| self.is_favorite(&s.id))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_favorite(&self, store_id: &str) -> bool {
        self.favorites.iter().any(|id| id == store_id)
    }

    #[must_use]
    pub fn store(&self, store_id: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == store_id)
    }

    #[must_use]
    pub fn is_busy(&self, feature: Feature) -> bool {
        self.inflight.is_busy(feature)
    }

    fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.notification_seq += 1;
        self.notification = Some(Notification {
            id: self.notification_seq,
            message: message.into(),
            kind,
        });
    }

    fn clear_analysis(&mut self) {
        self.analysis = AnalysisSession::default();
    }
}

/// Computes the next state.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Hydrated {
            favorites,
            receipt_history,
        } => {
            state.favorites = favorites;
            state.receipt_history = receipt_history;
        }

        Action::CatalogRequested => state.catalog_loading = true,

        Action::StoresLoaded(stores) => {
            state.catalog_loading = false;
            if stores.is_empty() {
                state.notify(MSG_CATALOG_EMPTY, NotificationKind::Error);
            } else {
                state.notify(MSG_CATALOG_LOADED, NotificationKind::Success);
            }
            state.stores = stores;
        }

        Action::SelectCategory(category) => state.filter.category = category,

        Action::SetSearch(term) => state.filter.search = term,

        Action::Explore => {
            if state.view == Some(View::ReceiptAnalysis) {
                state.clear_analysis();
            }
            state.view = None;
            state.filter.category = CategoryFilter::All;
            state.filter.search.clear();
        }

        Action::LocationRequested => {
            state.location_loading = true;
            state.location_error = None;
        }

        Action::LocationAcquired(coordinate) => {
            state.location_loading = false;
            state.location_error = None;
            state.filter.proximity.device = Some(coordinate);
            state.filter.proximity.active = true;
            state.notify(MSG_NEARBY_ON, NotificationKind::Success);
        }

        Action::LocationFailed(message) => {
            state.location_loading = false;
            state.filter.proximity.active = false;
            state.filter.proximity.device = None;
            state.notify(message.clone(), NotificationKind::Error);
            state.location_error = Some(message);
        }

        Action::ProximityDisabled => {
            state.filter.proximity.active = false;
            state.filter.proximity.device = None;
            state.location_error = None;
            state.notify(MSG_NEARBY_OFF, NotificationKind::Info);
        }

        Action::ToggleFavorite(store_id) => {
            if state.is_favorite(&store_id) {
                state.favorites.retain(|id| *id != store_id);
                state.notify(MSG_FAVORITE_REMOVED, NotificationKind::Info);
            } else {
                state.favorites.push(store_id);
                state.notify(MSG_FAVORITE_ADDED, NotificationKind::Success);
            }
        }

        Action::RequestStarted(feature) => {
            state.inflight.begin(feature);
            match feature {
                Feature::Recommendation => state.recommendations.clear(),
                Feature::ImageReceipt => {
                    state.analysis.result = None;
                    state.analysis.saved = false;
                }
                Feature::TextReceipt => {}
            }
        }

        Action::RecommendationsReceived { token, stores } => {
            if !state.inflight.complete(Feature::Recommendation, token) {
                return state;
            }
            if stores.is_empty() {
                state.notify(MSG_NO_RECOMMENDATION, NotificationKind::Info);
            } else {
                state.notify(MSG_RECOMMENDED, NotificationKind::Success);
            }
            state.recommendations = stores;
        }

        Action::TextReceiptParsed { token, receipt } => {
            if !state.inflight.complete(Feature::TextReceipt, token) {
                return state;
            }
            match receipt {
                Some(receipt) => {
                    if state.view == Some(View::TextReceipt) {
                        state.view = None;
                    }
                    if state
                        .receipt_history
                        .iter()
                        .any(|r| r.is_same_receipt(&receipt))
                    {
                        state.notify(MSG_DUPLICATE_RECEIPT, NotificationKind::Info);
                        return state;
                    }
                    state.receipt_history.insert(0, receipt);
                    state.notify(MSG_TEXT_RECEIPT_SAVED, NotificationKind::Success);
                }
                None => state.notify(MSG_TEXT_RECEIPT_FAILED, NotificationKind::Error),
            }
        }

        Action::ImageSelected(image) => {
            state.analysis = AnalysisSession {
                image: Some(image),
                result: None,
                saved: false,
            };
        }

        Action::ImageRejected(message) => state.notify(message, NotificationKind::Error),

        Action::ReceiptAnalyzed { token, result } => {
            if !state.inflight.complete(Feature::ImageReceipt, token) {
                return state;
            }
            if result.is_some() {
                state.notify(MSG_IMAGE_ANALYZED, NotificationKind::Success);
            } else {
                state.notify(MSG_IMAGE_FAILED, NotificationKind::Error);
            }
            state.analysis.result = result;
        }

        Action::SaveAnalyzedReceipt { receipt_id } => {
            let Some(result) = &state.analysis.result else {
                return state;
            };
            let analyzed = &result.analyzed_receipt;
            if state
                .receipt_history
                .iter()
                .any(|r| r.is_same_purchase(analyzed))
            {
                state.analysis.saved = true;
                state.notify(MSG_DUPLICATE_RECEIPT, NotificationKind::Info);
                return state;
            }
            let receipt = analyzed.clone().into_receipt_with_id(receipt_id);
            state.receipt_history.insert(0, receipt);
            state.analysis.saved = true;
            state.notify(MSG_ANALYZED_RECEIPT_SAVED, NotificationKind::Success);
        }

        Action::OpenView(view) => {
            match view {
                View::AiRecommender => state.recommendations.clear(),
                View::ReceiptAnalysis => state.clear_analysis(),
                _ => {}
            }
            state.view = Some(view);
        }

        Action::CloseView => {
            if state.view == Some(View::ReceiptAnalysis) {
                state.clear_analysis();
            }
            state.view = None;
        }

        Action::Notify { message, kind } => state.notify(message, kind),
    }
    state
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
