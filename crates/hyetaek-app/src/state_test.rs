use hyetaek_core::{AnalyzedReceipt, Category, SuggestedDiscount};

use super::*;

fn store(id: &str) -> Store {
    Store {
        id: id.to_string(),
        name: format!("가게 {id}"),
        category: Category::Food,
        address: "서울".to_string(),
        contact: None,
        latitude: None,
        longitude: None,
        discounts: Vec::new(),
        image_url: None,
        rating: None,
        operating_hours: None,
    }
}

fn analyzed(store_name: &str, date: &str, total: &str) -> AnalyzedReceipt {
    AnalyzedReceipt {
        store_name: store_name.to_string(),
        items: vec!["징거버거 세트".to_string()],
        discount_applied: "없음".to_string(),
        total_amount: total.to_string(),
        date: date.to_string(),
        store_category: Some(Category::Food),
    }
}

fn analysis(receipt: AnalyzedReceipt) -> ReceiptAnalysisResult {
    ReceiptAnalysisResult {
        analyzed_receipt: receipt,
        immediate_benefits: vec![SuggestedDiscount {
            title: "설문 쿠폰".to_string(),
            description: "세트 업그레이드".to_string(),
        }],
        future_benefits: Vec::new(),
    }
}

fn image() -> ReceiptImage {
    ReceiptImage {
        file_name: "r.png".to_string(),
        media_type: "image/png".to_string(),
        bytes: vec![1, 2, 3],
    }
}

fn message(state: &AppState) -> &str {
    state
        .notification
        .as_ref()
        .map_or("", |n| n.message.as_str())
}

fn kind(state: &AppState) -> Option<NotificationKind> {
    state.notification.as_ref().map(|n| n.kind)
}

fn started(state: AppState, feature: Feature) -> (AppState, RequestToken) {
    let state = reduce(state, Action::RequestStarted(feature));
    let token = state.inflight.current(feature).unwrap();
    (state, token)
}

// -----------------------------------------------------------------------
// Catalog
// -----------------------------------------------------------------------

#[test]
fn stores_loaded_notifies_success_or_error() {
    let state = reduce(AppState::default(), Action::CatalogRequested);
    assert!(state.catalog_loading);

    let loaded = reduce(state.clone(), Action::StoresLoaded(vec![store("a")]));
    assert!(!loaded.catalog_loading);
    assert_eq!(loaded.stores.len(), 1);
    assert_eq!(message(&loaded), MSG_CATALOG_LOADED);

    let empty = reduce(state, Action::StoresLoaded(Vec::new()));
    assert_eq!(message(&empty), MSG_CATALOG_EMPTY);
    assert_eq!(kind(&empty), Some(NotificationKind::Error));
}

#[test]
fn notification_ids_increase() {
    let state = reduce(
        AppState::default(),
        Action::Notify {
            message: "a".to_string(),
            kind: NotificationKind::Info,
        },
    );
    let first = state.notification.clone().unwrap().id;
    let state = reduce(
        state,
        Action::Notify {
            message: "a".to_string(),
            kind: NotificationKind::Info,
        },
    );
    assert!(state.notification.unwrap().id > first);
}

#[test]
fn explore_resets_filters_and_view() {
    let mut state = AppState::default();
    state = reduce(state, Action::SelectCategory(CategoryFilter::Only(Category::Study)));
    state = reduce(state, Action::SetSearch("카페".to_string()));
    state = reduce(state, Action::OpenView(View::Favorites));
    state = reduce(state, Action::Explore);
    assert_eq!(state.filter.category, CategoryFilter::All);
    assert!(state.filter.search.is_empty());
    assert_eq!(state.view, None);
}

// -----------------------------------------------------------------------
// Favorites
// -----------------------------------------------------------------------

#[test]
fn toggle_favorite_adds_then_removes() {
    let mut state = AppState::default();
    state.stores = vec![store("a"), store("b")];

    state = reduce(state, Action::ToggleFavorite("b".to_string()));
    assert_eq!(state.favorites, vec!["b"]);
    assert_eq!(message(&state), MSG_FAVORITE_ADDED);
    assert_eq!(state.favorite_stores()[0].id, "b");

    state = reduce(state, Action::ToggleFavorite("b".to_string()));
    assert!(state.favorites.is_empty());
    assert_eq!(message(&state), MSG_FAVORITE_REMOVED);
    assert_eq!(kind(&state), Some(NotificationKind::Info));
}

#[test]
fn favorite_stores_skip_ids_missing_from_catalog() {
    let mut state = AppState::default();
    state.stores = vec![store("a"), store("b")];
    state.favorites = vec!["gone".to_string(), "b".to_string(), "a".to_string()];
    let ids: Vec<String> = state.favorite_stores().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

// -----------------------------------------------------------------------
// Location
// -----------------------------------------------------------------------

#[test]
fn location_acquired_enables_proximity() {
    let mut state = reduce(AppState::default(), Action::LocationRequested);
    assert!(state.location_loading);
    let here = Coordinate::new(37.55, 126.92);
    state = reduce(state, Action::LocationAcquired(here));
    assert!(!state.location_loading);
    assert!(state.filter.proximity.active);
    assert_eq!(state.filter.proximity.device, Some(here));
    assert_eq!(message(&state), MSG_NEARBY_ON);
}

#[test]
fn location_failure_keeps_proximity_off_and_surfaces_message() {
    let text = "위치 정보를 가져올 수 없습니다. 현재 위치를 확인할 수 없습니다.";
    let state = reduce(
        reduce(AppState::default(), Action::LocationRequested),
        Action::LocationFailed(text.to_string()),
    );
    assert!(!state.filter.proximity.active);
    assert_eq!(state.location_error.as_deref(), Some(text));
    assert_eq!(message(&state), text);
    assert_eq!(kind(&state), Some(NotificationKind::Error));
}

#[test]
fn disabling_proximity_discards_coordinate() {
    let mut state = reduce(
        AppState::default(),
        Action::LocationAcquired(Coordinate::new(0.0, 0.0)),
    );
    state = reduce(state, Action::ProximityDisabled);
    assert!(!state.filter.proximity.active);
    assert_eq!(state.filter.proximity.device, None);
    assert_eq!(message(&state), MSG_NEARBY_OFF);
}

// -----------------------------------------------------------------------
// Requests and stale responses
// -----------------------------------------------------------------------

#[test]
fn recommendations_apply_for_current_token() {
    let mut state = AppState::default();
    state.recommendations = vec![store("old")];
    let (state, token) = started(state, Feature::Recommendation);
    assert!(state.recommendations.is_empty());
    assert!(state.is_busy(Feature::Recommendation));

    let state = reduce(
        state,
        Action::RecommendationsReceived {
            token,
            stores: vec![store("a")],
        },
    );
    assert!(!state.is_busy(Feature::Recommendation));
    assert_eq!(state.recommendations.len(), 1);
    assert_eq!(message(&state), MSG_RECOMMENDED);
}

#[test]
fn empty_recommendations_notify_info() {
    let (state, token) = started(AppState::default(), Feature::Recommendation);
    let state = reduce(
        state,
        Action::RecommendationsReceived {
            token,
            stores: Vec::new(),
        },
    );
    assert_eq!(message(&state), MSG_NO_RECOMMENDATION);
    assert_eq!(kind(&state), Some(NotificationKind::Info));
}

#[test]
fn stale_response_is_discarded() {
    let (state, old) = started(AppState::default(), Feature::Recommendation);
    let (state, new) = started(state, Feature::Recommendation);

    let after_stale = reduce(
        state.clone(),
        Action::RecommendationsReceived {
            token: old,
            stores: vec![store("stale")],
        },
    );
    assert_eq!(after_stale, state);
    assert!(after_stale.is_busy(Feature::Recommendation));

    let after_fresh = reduce(
        after_stale,
        Action::RecommendationsReceived {
            token: new,
            stores: vec![store("fresh")],
        },
    );
    assert_eq!(after_fresh.recommendations[0].id, "fresh");
}

#[test]
fn text_receipt_is_prepended_and_closes_view() {
    let mut state = AppState::default();
    state.receipt_history = vec![analyzed("A", "2024-01-01", "1000원").into_receipt_with_id("r0".into())];
    state = reduce(state, Action::OpenView(View::TextReceipt));
    let (state, token) = started(state, Feature::TextReceipt);

    let receipt = analyzed("B", "2024-02-02", "2000원").into_receipt_with_id("r1".into());
    let state = reduce(
        state,
        Action::TextReceiptParsed {
            token,
            receipt: Some(receipt),
        },
    );
    assert_eq!(state.receipt_history[0].id, "r1");
    assert_eq!(state.receipt_history[1].id, "r0");
    assert_eq!(state.view, None);
    assert_eq!(message(&state), MSG_TEXT_RECEIPT_SAVED);
}

#[test]
fn duplicate_text_receipt_is_not_added() {
    let mut state = AppState::default();
    state.receipt_history = vec![analyzed("A", "2024-01-01", "1000원").into_receipt_with_id("r0".into())];
    state = reduce(state, Action::OpenView(View::TextReceipt));
    let (state, token) = started(state, Feature::TextReceipt);

    let receipt = analyzed("A", "2024-01-01", "1000원").into_receipt_with_id("r1".into());
    let state = reduce(
        state,
        Action::TextReceiptParsed {
            token,
            receipt: Some(receipt),
        },
    );
    assert_eq!(state.receipt_history.len(), 1);
    assert_eq!(state.receipt_history[0].id, "r0");
    assert_eq!(state.view, None);
    assert_eq!(message(&state), MSG_DUPLICATE_RECEIPT);
    assert_eq!(kind(&state), Some(NotificationKind::Info));
    assert!(!state.is_busy(Feature::TextReceipt));
}

#[test]
fn failed_text_receipt_keeps_history_and_view() {
    let state = reduce(AppState::default(), Action::OpenView(View::TextReceipt));
    let (state, token) = started(state, Feature::TextReceipt);
    let state = reduce(
        state,
        Action::TextReceiptParsed {
            token,
            receipt: None,
        },
    );
    assert!(state.receipt_history.is_empty());
    assert_eq!(state.view, Some(View::TextReceipt));
    assert_eq!(message(&state), MSG_TEXT_RECEIPT_FAILED);
    assert!(!state.is_busy(Feature::TextReceipt));
}

// -----------------------------------------------------------------------
// Receipt image analysis
// -----------------------------------------------------------------------

fn analyzed_state(receipt: AnalyzedReceipt) -> AppState {
    let state = reduce(AppState::default(), Action::OpenView(View::ReceiptAnalysis));
    let state = reduce(state, Action::ImageSelected(image()));
    let (state, token) = started(state, Feature::ImageReceipt);
    reduce(
        state,
        Action::ReceiptAnalyzed {
            token,
            result: Some(analysis(receipt)),
        },
    )
}

#[test]
fn image_analysis_result_is_stored() {
    let state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    assert!(state.analysis.result.is_some());
    assert!(!state.analysis.saved);
    assert_eq!(message(&state), MSG_IMAGE_ANALYZED);
}

#[test]
fn failed_image_analysis_notifies_error() {
    let state = reduce(AppState::default(), Action::ImageSelected(image()));
    let (state, token) = started(state, Feature::ImageReceipt);
    let state = reduce(
        state,
        Action::ReceiptAnalyzed {
            token,
            result: None,
        },
    );
    assert!(state.analysis.result.is_none());
    assert!(state.analysis.image.is_some());
    assert_eq!(message(&state), MSG_IMAGE_FAILED);
}

#[test]
fn saving_analyzed_receipt_prepends_with_given_id() {
    let state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    let state = reduce(
        state,
        Action::SaveAnalyzedReceipt {
            receipt_id: "new-id".to_string(),
        },
    );
    assert_eq!(state.receipt_history.len(), 1);
    assert_eq!(state.receipt_history[0].id, "new-id");
    assert_eq!(state.receipt_history[0].store_name, "KFC");
    assert!(state.analysis.saved);
    assert_eq!(message(&state), MSG_ANALYZED_RECEIPT_SAVED);
}

#[test]
fn duplicate_save_leaves_history_unchanged_but_marks_saved() {
    let mut state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    let mut existing = analyzed("KFC", "2024-07-27", "7,800원").into_receipt_with_id("r0".into());
    existing.items = vec!["다른 품목".to_string()];
    state.receipt_history = vec![existing];
    let before = state.receipt_history.clone();

    let state = reduce(
        state,
        Action::SaveAnalyzedReceipt {
            receipt_id: "new-id".to_string(),
        },
    );
    assert_eq!(state.receipt_history, before);
    assert!(state.analysis.saved);
    assert_eq!(message(&state), MSG_DUPLICATE_RECEIPT);
    assert_eq!(kind(&state), Some(NotificationKind::Info));
}

#[test]
fn different_total_is_not_a_duplicate() {
    let mut state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    state.receipt_history =
        vec![analyzed("KFC", "2024-07-27", "8,800원").into_receipt_with_id("r0".into())];
    let state = reduce(
        state,
        Action::SaveAnalyzedReceipt {
            receipt_id: "new-id".to_string(),
        },
    );
    assert_eq!(state.receipt_history.len(), 2);
}

#[test]
fn save_without_result_is_noop() {
    let state = AppState::default();
    let after = reduce(
        state.clone(),
        Action::SaveAnalyzedReceipt {
            receipt_id: "x".to_string(),
        },
    );
    assert_eq!(after, state);
}

#[test]
fn closing_analysis_view_clears_session() {
    let state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    let state = reduce(
        state,
        Action::SaveAnalyzedReceipt {
            receipt_id: "id".to_string(),
        },
    );
    let state = reduce(state, Action::CloseView);
    assert_eq!(state.view, None);
    assert_eq!(state.analysis, AnalysisSession::default());
    assert_eq!(state.receipt_history.len(), 1);
}

#[test]
fn closing_other_views_keeps_session() {
    let state = reduce(AppState::default(), Action::ImageSelected(image()));
    let state = reduce(state, Action::OpenView(View::ReceiptHistory));
    let state = reduce(state, Action::CloseView);
    assert!(state.analysis.image.is_some());
}

#[test]
fn selecting_new_image_resets_result_and_saved() {
    let state = analyzed_state(analyzed("KFC", "2024-07-27", "7,800원"));
    let state = reduce(
        state,
        Action::SaveAnalyzedReceipt {
            receipt_id: "id".to_string(),
        },
    );
    let state = reduce(state, Action::ImageSelected(image()));
    assert!(state.analysis.result.is_none());
    assert!(!state.analysis.saved);
}

#[test]
fn rejected_image_only_notifies() {
    let state = reduce(AppState::default(), Action::ImageSelected(image()));
    let after = reduce(
        state.clone(),
        Action::ImageRejected("이미지 파일만 업로드 가능합니다 (JPG, PNG 등).".to_string()),
    );
    assert_eq!(after.analysis, state.analysis);
    assert_eq!(kind(&after), Some(NotificationKind::Error));
}

#[test]
fn opening_recommender_clears_previous_recommendations() {
    let mut state = AppState::default();
    state.recommendations = vec![store("a")];
    let state = reduce(state, Action::OpenView(View::AiRecommender));
    assert!(state.recommendations.is_empty());
    assert_eq!(state.view, Some(View::AiRecommender));
}
