//! Request and response shapes of the QnA Maker runtime API.

use serde::{Deserialize, Serialize};

/// Name/value pair attached to a QnA pair; also used as a strict filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub value: String,
}

/// A follow-up prompt offered with an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnAPrompt {
    #[serde(default)]
    pub display_order: i32,
    pub qna_id: i64,
    pub display_text: String,
}

/// Multi-turn context returned with an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnAResponseContext {
    #[serde(default)]
    pub is_context_only: bool,
    #[serde(default)]
    pub prompts: Vec<QnAPrompt>,
}

/// Multi-turn context sent with a follow-up query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QnARequestContext {
    pub previous_qna_id: i64,
    pub previous_user_query: String,
}

/// One answer. `score` is normalized to 0..1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default = "default_id")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<QnAResponseContext>,
}

fn default_id() -> i64 {
    -1
}

impl QueryResult {
    /// Follow-up prompts ordered by `displayOrder`; empty when the answer has none.
    pub fn prompts(&self) -> Vec<QnAPrompt> {
        let mut prompts = self
            .context
            .as_ref()
            .map(|c| c.prompts.clone())
            .unwrap_or_default();
        prompts.sort_by_key(|p| p.display_order);
        prompts
    }
}

/// Query options. `score_threshold` is on the 0..1 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct QnAMakerOptions {
    pub top: usize,
    pub score_threshold: f32,
    pub strict_filters: Vec<Metadata>,
    pub context: Option<QnARequestContext>,
    pub qna_id: Option<i64>,
    pub is_test: bool,
    pub ranker_type: Option<String>,
}

impl Default for QnAMakerOptions {
    fn default() -> Self {
        Self {
            top: 1,
            score_threshold: 0.3,
            strict_filters: Vec::new(),
            context: None,
            qna_id: None,
            is_test: false,
            ranker_type: None,
        }
    }
}

/// Active-learning feedback: the question a user asked and the QnA id they picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub user_id: String,
    pub user_question: String,
    pub qna_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateAnswerRequest<'a> {
    pub question: &'a str,
    pub top: usize,
    pub score_threshold: f64,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub strict_filters: &'a [Metadata],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a QnARequestContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qna_id: Option<i64>,
    pub is_test: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranker_type: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateAnswerResponse {
    #[serde(default)]
    pub answers: Vec<QueryResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrainRequest<'a> {
    pub feedback_records: &'a [FeedbackRecord],
}
