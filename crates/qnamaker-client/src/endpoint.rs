//! Knowledge-base endpoint built from configuration values.
//!
//! Host names are accepted in the forms the portal shows (`myqna.azurewebsites.net`,
//! `https://myqna.azurewebsites.net/qnamaker`, a `/v5.0` language-service URL) and turned
//! into the runtime base URL the REST calls are appended to.

use crate::error::QnAMakerError;

/// Base URL, knowledge base id and endpoint key for one knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QnAMakerEndpoint {
    pub knowledge_base_id: String,
    pub endpoint_key: String,
    pub host: String,
}

impl QnAMakerEndpoint {
    /// Builds an endpoint, normalizing `host_name`. All three values must be non-empty.
    pub fn new(
        knowledge_base_id: impl Into<String>,
        endpoint_key: impl Into<String>,
        host_name: &str,
    ) -> Result<Self, QnAMakerError> {
        let knowledge_base_id = knowledge_base_id.into();
        let endpoint_key = endpoint_key.into();
        if knowledge_base_id.trim().is_empty() {
            return Err(QnAMakerError::InvalidEndpoint(
                "knowledge base id is empty".to_string(),
            ));
        }
        if endpoint_key.trim().is_empty() {
            return Err(QnAMakerError::InvalidEndpoint("endpoint key is empty".to_string()));
        }
        if host_name.trim().is_empty() {
            return Err(QnAMakerError::InvalidEndpoint("host name is empty".to_string()));
        }
        Ok(Self {
            knowledge_base_id,
            endpoint_key,
            host: normalize_host_name(host_name),
        })
    }

    /// `{host}/knowledgebases/{kbId}/generateAnswer`
    pub fn generate_answer_url(&self) -> String {
        format!(
            "{}/knowledgebases/{}/generateAnswer",
            self.host, self.knowledge_base_id
        )
    }

    /// `{host}/knowledgebases/{kbId}/train`
    pub fn train_url(&self) -> String {
        format!("{}/knowledgebases/{}/train", self.host, self.knowledge_base_id)
    }
}

/// Normalizes a configured host name.
///
/// - surrounding whitespace and trailing `/` are removed
/// - `https://` is prefixed unless an `http://` or `https://` scheme is present
/// - `/qnamaker` is appended unless the host contains `/v5.0` or already ends with `/qnamaker`
pub fn normalize_host_name(host_name: &str) -> String {
    let trimmed = host_name.trim().trim_end_matches('/');
    let lower = trimmed.to_ascii_lowercase();

    let mut host = if lower.starts_with("https://") || lower.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    if !host.contains("/v5.0") && !host.ends_with("/qnamaker") {
        host.push_str("/qnamaker");
    }
    host
}

/// Picks the endpoint key: `primary` unless it is unset or blank, then `legacy`.
/// Returns `None` when neither carries a value.
pub fn resolve_endpoint_key(primary: Option<&str>, legacy: Option<&str>) -> Option<String> {
    [primary, legacy]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .map(str::to_string)
}
