//! # QnA Maker client
//!
//! REST client for a hosted QnA Maker knowledge base: `generateAnswer` queries, `train`
//! feedback for active learning, endpoint normalization from configuration, and key masking
//! for safe logging.
//!
//! The [`QnAMaker`] trait is the seam callers depend on; [`QnAMakerClient`] is the HTTP
//! implementation.

mod active_learning;
mod client;
mod endpoint;
mod error;
mod types;

pub use active_learning::get_low_score_variation;
pub use client::{QnAMaker, QnAMakerClient};
pub use endpoint::{normalize_host_name, resolve_endpoint_key, QnAMakerEndpoint};
pub use error::QnAMakerError;
pub use types::{
    FeedbackRecord, Metadata, QnAMakerOptions, QnAPrompt, QnARequestContext, QnAResponseContext,
    QueryResult,
};

/// Masks an endpoint key for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
