//! Plain-text formatting for terminal output.

use std::fmt::Write as _;

use hyetaek_app::{AppState, Notification, NotificationKind, RankedStore};
use hyetaek_core::{ReceiptAnalysisResult, ReceiptData, Store, SuggestedDiscount};

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn notification(n: &Notification) -> String {
    let tag = match n.kind {
        NotificationKind::Success => "성공",
        NotificationKind::Error => "오류",
        NotificationKind::Info => "알림",
    };
    format!("[{tag}] {}", n.message)
}

pub(crate) fn distance(km: f64) -> String {
    format!("약 {km:.1}km")
}

/// One row per store; `*` marks favorites.
pub(crate) fn store_table(rows: &[RankedStore], state: &AppState) -> String {
    if rows.is_empty() {
        return "no stores match the current filters".to_string();
    }

    let mut out = format!(
        "{:<3}{:<10}{:<28}{:<12}{:<9}ID",
        "", "CATEGORY", "NAME", "DISTANCE", "BENEFITS"
    );
    for row in rows {
        let store = &row.store;
        let marker = if state.is_favorite(&store.id) { "*" } else { "" };
        let dist = row
            .known_distance_km()
            .map_or_else(|| "\u{2014}".to_string(), distance);
        let _ = write!(
            out,
            "\n{:<3}{:<10}{:<28}{:<12}{:<9}{}",
            marker,
            store.category.label(),
            truncate(&store.name, 24),
            dist,
            store.discounts.len(),
            store.id
        );
    }
    out
}

pub(crate) fn store_detail(store: &Store, distance_km: Option<f64>) -> String {
    let mut out = format!("{} [{}]", store.name, store.category);
    if let Some(rating) = store.rating {
        let _ = write!(out, "\n  평점: {rating:.1} / 5.0");
    }
    let _ = write!(out, "\n  주소: {}", store.address);
    if let Some(km) = distance_km.filter(|d| d.is_finite()) {
        let _ = write!(out, "\n  거리: {}", distance(km));
    }
    if let Some(contact) = &store.contact {
        let _ = write!(out, "\n  연락처: {contact}");
    }
    if let Some(hours) = &store.operating_hours {
        let _ = write!(out, "\n  운영시간: {hours}");
    }
    out.push_str("\n  제공 혜택:");
    if store.discounts.is_empty() {
        out.push_str(" 없음");
    }
    for discount in &store.discounts {
        let _ = write!(out, "\n    - {}", discount.description);
        if !discount.conditions.is_empty() {
            let _ = write!(out, " ({})", discount.conditions);
        }
    }
    let _ = write!(out, "\n  id: {}", store.id);
    out
}

pub(crate) fn receipt_table(receipts: &[ReceiptData]) -> String {
    let mut out = format!(
        "{:<12}{:<24}{:<12}{:<10}DISCOUNT",
        "DATE", "STORE", "TOTAL", "CATEGORY"
    );
    for receipt in receipts {
        let category = receipt
            .store_category
            .map_or("\u{2014}", hyetaek_core::Category::label);
        let _ = write!(
            out,
            "\n{:<12}{:<24}{:<12}{:<10}{}",
            receipt.date,
            truncate(&receipt.store_name, 20),
            receipt.total_amount,
            category,
            receipt.discount_applied
        );
    }
    out
}

fn benefit_lines(out: &mut String, title: &str, benefits: &[SuggestedDiscount]) {
    let _ = write!(out, "\n{title}:");
    if benefits.is_empty() {
        out.push_str(" 없음");
    }
    for benefit in benefits {
        let _ = write!(out, "\n  - {}: {}", benefit.title, benefit.description);
    }
}

pub(crate) fn analysis(result: &ReceiptAnalysisResult) -> String {
    let receipt = &result.analyzed_receipt;
    let mut out = format!(
        "{} ({})\n  품목: {}\n  결제 금액: {}\n  적용된 할인: {}",
        receipt.store_name,
        receipt.date,
        receipt.items.join(", "),
        receipt.total_amount,
        receipt.discount_applied
    );
    benefit_lines(&mut out, "지금 받을 수 있는 혜택", &result.immediate_benefits);
    benefit_lines(&mut out, "다음 방문 혜택", &result.future_benefits);
    out
}

#[cfg(test)]
mod tests {
    use hyetaek_app::{filter_stores, FilterInputs};
    use hyetaek_core::{AnalyzedReceipt, Category, DiscountInfo};

    use super::*;

    fn store() -> Store {
        Store {
            id: "s1".to_string(),
            name: "교보문고 광화문점".to_string(),
            category: Category::Study,
            address: "서울 종로구 종로 1".to_string(),
            contact: Some("02-123-4567".to_string()),
            latitude: None,
            longitude: None,
            discounts: vec![DiscountInfo {
                id: "d1".to_string(),
                description: "전공서적 10% 할인".to_string(),
                conditions: "학생증 필수".to_string(),
            }],
            image_url: None,
            rating: Some(4.76),
            operating_hours: None,
        }
    }

    #[test]
    fn truncate_appends_ellipsis_by_chars() {
        assert_eq!(truncate("가나다라", 2), "가나...");
        assert_eq!(truncate("가나", 2), "가나");
    }

    #[test]
    fn notification_is_tagged_by_kind() {
        let n = Notification {
            id: 1,
            message: "찜 목록에 추가되었습니다!".to_string(),
            kind: NotificationKind::Success,
        };
        assert_eq!(notification(&n), "[성공] 찜 목록에 추가되었습니다!");
    }

    #[test]
    fn store_detail_lists_fields_and_discounts() {
        let text = store_detail(&store(), Some(1.234));
        assert!(text.starts_with("교보문고 광화문점 [스터디]"));
        assert!(text.contains("평점: 4.8 / 5.0"));
        assert!(text.contains("거리: 약 1.2km"));
        assert!(text.contains("연락처: 02-123-4567"));
        assert!(text.contains("- 전공서적 10% 할인 (학생증 필수)"));
        assert!(!text.contains("운영시간"));
    }

    #[test]
    fn store_detail_hides_infinite_distance() {
        assert!(!store_detail(&store(), Some(f64::INFINITY)).contains("거리"));
    }

    #[test]
    fn store_table_marks_favorites() {
        let mut state = AppState::default();
        state.stores = vec![store()];
        state.favorites = vec!["s1".to_string()];
        let rows = filter_stores(&state.stores, &FilterInputs::default());
        let table = store_table(&rows, &state);
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with('*'));
        assert!(row.ends_with("s1"));
    }

    #[test]
    fn empty_store_table_has_message() {
        assert_eq!(
            store_table(&[], &AppState::default()),
            "no stores match the current filters"
        );
    }

    #[test]
    fn analysis_lists_both_benefit_groups() {
        let result = ReceiptAnalysisResult {
            analyzed_receipt: AnalyzedReceipt {
                store_name: "KFC".to_string(),
                items: vec!["징거버거 세트".to_string()],
                discount_applied: "없음".to_string(),
                total_amount: "7,800원".to_string(),
                date: "2024-07-27".to_string(),
                store_category: Some(Category::Food),
            },
            immediate_benefits: vec![SuggestedDiscount {
                title: "설문 쿠폰".to_string(),
                description: "세트 업그레이드".to_string(),
            }],
            future_benefits: Vec::new(),
        };
        let text = analysis(&result);
        assert!(text.contains("  - 설문 쿠폰: 세트 업그레이드"));
        assert!(text.contains("다음 방문 혜택: 없음"));
    }
}
