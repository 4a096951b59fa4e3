//! Per-feature request tokens.
//!
//! Every AI request mints a fresh token. Only the response carrying the
//! latest token for its feature is applied; anything older is stale.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Recommendation,
    TextReceipt,
    ImageReceipt,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Feature::Recommendation => "recommendation",
            Feature::TextReceipt => "text_receipt",
            Feature::ImageReceipt => "image_receipt",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlight {
    last_issued: u64,
    current: HashMap<Feature, RequestToken>,
}

impl InFlight {
    /// Mints a token for `feature`, superseding any request still pending.
    pub fn begin(&mut self, feature: Feature) -> RequestToken {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        if let Some(previous) = self.current.insert(feature, token) {
            tracing::debug!(%feature, %previous, %token, "superseding pending request");
        }
        token
    }

    #[must_use]
    pub fn current(&self, feature: Feature) -> Option<RequestToken> {
        self.current.get(&feature).copied()
    }

    #[must_use]
    pub fn is_busy(&self, feature: Feature) -> bool {
        self.current.contains_key(&feature)
    }

    /// Settles `token`. Returns `false` (and leaves state alone) when the
    /// token is no longer the current one for `feature`.
    pub fn complete(&mut self, feature: Feature, token: RequestToken) -> bool {
        if self.current(feature) == Some(token) {
            self.current.remove(&feature);
            true
        } else {
            tracing::debug!(%feature, %token, "discarding stale response");
            false
        }
    }
}
