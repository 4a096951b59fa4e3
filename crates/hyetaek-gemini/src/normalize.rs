//! Normalization of raw model text into validated domain records.
//!
//! Everything here is pure: the same text yields the same result (apart from
//! freshly generated ids), with no network or storage access. The current date
//! is passed in by the caller.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::NaiveDate;
use hyetaek_core::{
    AnalyzedReceipt, Category, DiscountInfo, ReceiptAnalysisResult, Store, SuggestedDiscount,
    NO_DISCOUNT_LABEL,
};
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::types::{RawAnalysis, RawDiscount, RawReceipt, RawStore, RawSuggestion};

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\n?(.*?)\n?\s*```$").expect("valid regex")
});
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

/// Trims `text` and strips a surrounding ``` fence (optionally tagged `json`).
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match CODE_FENCE_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
    {
        Some(inner) if !inner.as_str().trim().is_empty() => inner.as_str().trim(),
        _ => trimmed,
    }
}

/// Removes a comma (and any whitespace after it) that directly precedes a
/// closing `]` or `}`. This is the only repair applied.
#[must_use]
pub fn repair_trailing_commas(text: &str) -> Cow<'_, str> {
    TRAILING_COMMA_RE.replace_all(text, "$1")
}

/// Parses model output into JSON.
///
/// Strict parse first; on failure one trailing-comma repair pass, then a
/// second parse. Returns `None` (and logs the original text) when both fail.
#[must_use]
pub fn extract_json(text: &str) -> Option<Value> {
    let candidate = strip_code_fence(text);

    let first_error = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return Some(value),
        Err(e) => e,
    };

    let repaired = repair_trailing_commas(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            tracing::debug!(error = %first_error, "model output parsed after trailing-comma repair");
            Some(value)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                original = %text,
                "model output is not valid JSON after repair"
            );
            None
        }
    }
}

/// Validates a seeded store list.
///
/// Returns `None` unless `value` is an array. Non-object elements are
/// skipped. Missing ids are generated, unknown categories become
/// [`Category::Other`], and coordinates/ratings must be JSON numbers.
#[must_use]
pub fn normalize_stores(value: &Value) -> Option<Vec<Store>> {
    let items = value.as_array()?;
    let stores = items
        .iter()
        .filter_map(|item| {
            if !item.is_object() {
                tracing::warn!(item = %item, "skipping non-object store entry");
                return None;
            }
            serde_json::from_value::<RawStore>(item.clone()).ok()
        })
        .map(|raw| normalize_store(&raw))
        .collect();
    Some(stores)
}

fn normalize_store(raw: &RawStore) -> Store {
    let id = id_or_generate(raw.id.as_ref());
    // Placeholder seed is the resolved store id.
    let image_url = text(raw.image_url.as_ref())
        .unwrap_or_else(|| format!("https://picsum.photos/seed/{id}/400/300"));
    Store {
        id,
        name: text_or_empty(raw.name.as_ref()),
        category: category_or_other(raw.category.as_ref()),
        address: text_or_empty(raw.address.as_ref()),
        contact: text(raw.contact.as_ref()),
        latitude: number(raw.latitude.as_ref()),
        longitude: number(raw.longitude.as_ref()),
        discounts: raw
            .discounts
            .as_ref()
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(normalize_discount).collect())
            .unwrap_or_default(),
        image_url: Some(image_url),
        rating: number(raw.rating.as_ref()).filter(|r| (0.0..=5.0).contains(r)),
        operating_hours: text(raw.operating_hours.as_ref()),
    }
}

fn normalize_discount(value: &Value) -> Option<DiscountInfo> {
    if !value.is_object() {
        return None;
    }
    let raw: RawDiscount = serde_json::from_value(value.clone()).ok()?;
    Some(DiscountInfo {
        id: id_or_generate(raw.id.as_ref()),
        description: text_or_empty(raw.description.as_ref()),
        conditions: text_or_empty(raw.conditions.as_ref()),
    })
}

/// Validates a recommendation response: an array of store ids.
#[must_use]
pub fn normalize_recommended_ids(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| text(Some(v)))
            .collect(),
    )
}

/// Validates a parsed receipt object.
///
/// Empty or missing dates become `today`; an unknown or missing category
/// becomes [`Category::Other`].
#[must_use]
pub fn normalize_receipt(value: &Value, today: NaiveDate) -> Option<AnalyzedReceipt> {
    if !value.is_object() {
        return None;
    }
    let raw: RawReceipt = serde_json::from_value(value.clone()).ok()?;
    Some(AnalyzedReceipt {
        store_name: text_or_empty(raw.store_name.as_ref()),
        items: string_list(raw.items.as_ref()),
        discount_applied: text(raw.discount_applied.as_ref())
            .unwrap_or_else(|| NO_DISCOUNT_LABEL.to_string()),
        total_amount: text_or_empty(raw.total_amount.as_ref()),
        date: text(raw.date.as_ref()).unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        store_category: Some(category_or_other(raw.store_category.as_ref())),
    })
}

/// Validates an image analysis response.
///
/// Requires an `analyzedReceipt` object; benefit lists default to empty and
/// entries without a title are dropped.
#[must_use]
pub fn normalize_analysis(value: &Value, today: NaiveDate) -> Option<ReceiptAnalysisResult> {
    if !value.is_object() {
        return None;
    }
    let raw: RawAnalysis = serde_json::from_value(value.clone()).ok()?;
    let analyzed_receipt = normalize_receipt(raw.analyzed_receipt.as_ref()?, today)?;
    Some(ReceiptAnalysisResult {
        analyzed_receipt,
        immediate_benefits: suggestions(raw.immediate_benefits.as_ref()),
        future_benefits: suggestions(raw.future_benefits.as_ref()),
    })
}

fn suggestions(value: Option<&Value>) -> Vec<SuggestedDiscount> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value::<RawSuggestion>(v.clone()).ok())
        .filter_map(|raw| {
            Some(SuggestedDiscount {
                title: text(raw.title.as_ref())?,
                description: text_or_empty(raw.description.as_ref()),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

/// Non-empty string; numbers are rendered (models sometimes emit `18000`
/// for a text field).
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or_empty(value: Option<&Value>) -> String {
    text(value).unwrap_or_default()
}

fn id_or_generate(value: Option<&Value>) -> String {
    text(value).unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Only genuine JSON numbers count; `"37.5"` is treated as absent.
fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn category_or_other(value: Option<&Value>) -> Category {
    value
        .and_then(Value::as_str)
        .map_or(Category::Other, Category::parse_or_other)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| text(Some(v))).collect())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
