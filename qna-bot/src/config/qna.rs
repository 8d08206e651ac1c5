//! QnA Maker knowledge-base settings.

use anyhow::Result;
use qnamaker_client::{resolve_endpoint_key, QnAMakerEndpoint};

use super::base::non_empty_var;

/// Knowledge base connection plus the dialog's configurable no-answer text.
#[derive(Debug, Clone)]
pub struct QnAConfig {
    /// QnAKnowledgebaseId
    pub knowledge_base_id: String,
    /// QnAEndpointKey, falling back to the legacy QnAAuthKey
    pub endpoint_key: String,
    /// QnAEndpointHostName as configured (normalized when the endpoint is built)
    pub host_name: String,
    /// DefaultAnswer
    pub default_answer: Option<String>,
}

impl QnAConfig {
    /// Load from environment variables. Missing values are left empty; `validate` reports them.
    pub fn from_env() -> Self {
        let endpoint_key = resolve_endpoint_key(
            non_empty_var("QnAEndpointKey").as_deref(),
            non_empty_var("QnAAuthKey").as_deref(),
        )
        .unwrap_or_default();

        Self {
            knowledge_base_id: non_empty_var("QnAKnowledgebaseId").unwrap_or_default(),
            endpoint_key,
            host_name: non_empty_var("QnAEndpointHostName").unwrap_or_default(),
            default_answer: non_empty_var("DefaultAnswer"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.knowledge_base_id.is_empty() {
            anyhow::bail!("QnAKnowledgebaseId not set");
        }
        if self.endpoint_key.is_empty() {
            anyhow::bail!("QnAEndpointKey (or legacy QnAAuthKey) not set");
        }
        if self.host_name.is_empty() {
            anyhow::bail!("QnAEndpointHostName not set");
        }
        Ok(())
    }

    /// Builds the normalized endpoint.
    pub fn endpoint(&self) -> Result<QnAMakerEndpoint> {
        Ok(QnAMakerEndpoint::new(
            self.knowledge_base_id.clone(),
            self.endpoint_key.clone(),
            &self.host_name,
        )?)
    }
}
