//! High-level discount operations backed by [`GeminiClient`].
//!
//! Each operation builds its prompt, sends one request, and normalizes the
//! reply. Transport errors, API errors and unusable model output are logged
//! and collapse to an empty list or `None`; callers never see a
//! [`GeminiError`](crate::GeminiError).

use chrono::{Local, NaiveDate};
use hyetaek_core::{CatalogConfig, ReceiptAnalysisResult, ReceiptData, Store};
use serde_json::Value;

use crate::client::GeminiClient;
use crate::normalize::{
    extract_json, normalize_analysis, normalize_receipt, normalize_recommended_ids,
    normalize_stores,
};
use crate::prompts;
use crate::types::Part;

pub struct DiscountGateway {
    client: GeminiClient,
    catalog: CatalogConfig,
}

impl DiscountGateway {
    #[must_use]
    pub fn new(client: GeminiClient, catalog: CatalogConfig) -> Self {
        Self { client, catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Asks the model for the initial store catalog.
    ///
    /// Returns an empty list on any failure.
    pub async fn fetch_initial_discounts(&self) -> Vec<Store> {
        let prompt = prompts::seed_catalog_prompt(&self.catalog);
        let Some(value) = self
            .request_json("fetch_initial_discounts", vec![Part::text(prompt)])
            .await
        else {
            return Vec::new();
        };

        match normalize_stores(&value) {
            Some(stores) => {
                tracing::info!(count = stores.len(), "seeded store catalog");
                stores
            }
            None => {
                tracing::warn!(
                    operation = "fetch_initial_discounts",
                    "model output is not a store array"
                );
                Vec::new()
            }
        }
    }

    /// Picks the stores that best match `preferences`.
    ///
    /// Returned stores keep the model's order, contain no duplicates, and are
    /// limited to the catalog's `recommendation_count`. Ids the model invents
    /// are dropped. An empty `stores` slice short-circuits without a request.
    pub async fn recommend(&self, preferences: &str, stores: &[Store]) -> Vec<Store> {
        if stores.is_empty() {
            return Vec::new();
        }

        let prompt =
            prompts::recommendation_prompt(preferences, stores, self.catalog.recommendation_count);
        let Some(value) = self
            .request_json("recommend", vec![Part::text(prompt)])
            .await
        else {
            return Vec::new();
        };

        let Some(ids) = normalize_recommended_ids(&value) else {
            tracing::warn!(operation = "recommend", "model output is not an id array");
            return Vec::new();
        };

        select_by_ids(stores, &ids, self.catalog.recommendation_count)
    }

    /// Extracts a receipt from free text and assigns it a fresh id.
    pub async fn analyze_receipt_text(&self, receipt_text: &str) -> Option<ReceiptData> {
        let prompt = prompts::receipt_text_prompt(receipt_text);
        let value = self
            .request_json("analyze_receipt_text", vec![Part::text(prompt)])
            .await?;

        let receipt = normalize_receipt(&value, today());
        if receipt.is_none() {
            tracing::warn!(
                operation = "analyze_receipt_text",
                "model output is not a receipt object"
            );
        }
        receipt.map(hyetaek_core::AnalyzedReceipt::into_receipt)
    }

    /// Analyzes a receipt image and proposes immediate and future benefits.
    pub async fn analyze_receipt_image(
        &self,
        media_type: &str,
        bytes: &[u8],
    ) -> Option<ReceiptAnalysisResult> {
        let parts = vec![
            Part::inline_image(media_type, bytes),
            Part::text(prompts::receipt_image_prompt()),
        ];
        let value = self.request_json("analyze_receipt_image", parts).await?;

        let result = normalize_analysis(&value, today());
        if result.is_none() {
            tracing::warn!(
                operation = "analyze_receipt_image",
                "model output is missing analyzedReceipt"
            );
        }
        result
    }

    async fn request_json(&self, operation: &'static str, parts: Vec<Part>) -> Option<Value> {
        tracing::debug!(operation, model = self.client.model(), "sending request");
        match self.client.generate_json(parts).await {
            Ok(text) => extract_json(&text),
            Err(e) => {
                tracing::error!(operation, error = %e, "gemini request failed");
                None
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolves `ids` against `stores` in order, skipping unknown and repeated ids.
fn select_by_ids(stores: &[Store], ids: &[String], limit: u32) -> Vec<Store> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut picked: Vec<Store> = Vec::new();
    for id in ids {
        if picked.len() >= limit {
            break;
        }
        if picked.iter().any(|s| &s.id == id) {
            continue;
        }
        match stores.iter().find(|s| &s.id == id) {
            Some(store) => picked.push(store.clone()),
            None => tracing::debug!(id = %id, "recommended id not in catalog"),
        }
    }
    picked
}
