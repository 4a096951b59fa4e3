use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Category;

/// Receipt fields extracted by the model, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedReceipt {
    pub store_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub discount_applied: String,
    pub total_amount: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_category: Option<Category>,
}

impl AnalyzedReceipt {
    /// Attach a fresh id, producing a history entry.
    #[must_use]
    pub fn into_receipt(self) -> ReceiptData {
        self.into_receipt_with_id(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn into_receipt_with_id(self, id: String) -> ReceiptData {
        ReceiptData {
            id,
            store_name: self.store_name,
            items: self.items,
            discount_applied: self.discount_applied,
            total_amount: self.total_amount,
            date: self.date,
            store_category: self.store_category,
        }
    }
}

/// A parsed receipt stored in the user's history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    pub id: String,
    pub store_name: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub discount_applied: String,
    pub total_amount: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_category: Option<Category>,
}

impl ReceiptData {
    /// Two receipts are the same purchase when store, date and total all match exactly.
    #[must_use]
    pub fn is_same_purchase(&self, other: &AnalyzedReceipt) -> bool {
        self.store_name == other.store_name
            && self.date == other.date
            && self.total_amount == other.total_amount
    }

    #[must_use]
    pub fn is_same_receipt(&self, other: &ReceiptData) -> bool {
        self.store_name == other.store_name
            && self.date == other.date
            && self.total_amount == other.total_amount
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedDiscount {
    pub title: String,
    pub description: String,
}

/// One analyzed receipt image plus the benefits suggested for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAnalysisResult {
    pub analyzed_receipt: AnalyzedReceipt,
    /// Usable right now with this receipt.
    #[serde(default)]
    pub immediate_benefits: Vec<SuggestedDiscount>,
    /// Worth knowing for later visits.
    #[serde(default)]
    pub future_benefits: Vec<SuggestedDiscount>,
}
