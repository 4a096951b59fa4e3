pub mod client;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod prompts;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use gateway::DiscountGateway;
pub use normalize::{
    extract_json, normalize_analysis, normalize_receipt, normalize_recommended_ids,
    normalize_stores, repair_trailing_commas, strip_code_fence,
};
pub use types::Part;
