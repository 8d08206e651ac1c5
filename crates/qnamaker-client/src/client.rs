use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::endpoint::QnAMakerEndpoint;
use crate::error::QnAMakerError;
use crate::mask_key;
use crate::types::{
    FeedbackRecord, GenerateAnswerRequest, GenerateAnswerResponse, QnAMakerOptions, QueryResult,
    TrainRequest,
};

/// Queries a knowledge base and sends active-learning feedback.
#[async_trait]
pub trait QnAMaker: Send + Sync {
    /// Answers for `question`, best first, at or above `options.score_threshold`.
    /// With `options.qna_id` set the question may be empty (lookup by id).
    async fn get_answers(
        &self,
        question: &str,
        options: &QnAMakerOptions,
    ) -> Result<Vec<QueryResult>, QnAMakerError>;

    /// Sends feedback records to the train endpoint.
    async fn call_train(&self, records: &[FeedbackRecord]) -> Result<(), QnAMakerError>;
}

/// HTTP implementation of [`QnAMaker`] against the runtime REST API.
#[derive(Debug, Clone)]
pub struct QnAMakerClient {
    http: Client,
    endpoint: QnAMakerEndpoint,
}

impl QnAMakerClient {
    pub fn new(endpoint: QnAMakerEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    /// Builds a client around an existing reqwest client (shared connection pool).
    pub fn with_client(http: Client, endpoint: QnAMakerEndpoint) -> Self {
        Self { http, endpoint }
    }

    pub fn endpoint(&self) -> &QnAMakerEndpoint {
        &self.endpoint
    }

    fn authorization(&self) -> String {
        format!("EndpointKey {}", self.endpoint.endpoint_key)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, QnAMakerError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(QnAMakerError::Status { status, body })
    }
}

fn validate_options(options: &QnAMakerOptions) -> Result<(), QnAMakerError> {
    if !(0.0..=1.0).contains(&options.score_threshold) {
        return Err(QnAMakerError::InvalidOptions(format!(
            "score_threshold must be between 0 and 1, got {}",
            options.score_threshold
        )));
    }
    if options.top < 1 {
        return Err(QnAMakerError::InvalidOptions(
            "top must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// The service takes the threshold on the 0..100 scale; rounding drops f32 noise (0.3 → 30.0).
fn threshold_percent(threshold: f32) -> f64 {
    (f64::from(threshold) * 100.0 * 1e4).round() / 1e4
}

#[async_trait]
impl QnAMaker for QnAMakerClient {
    #[instrument(skip(self, options), fields(kb = %self.endpoint.knowledge_base_id))]
    async fn get_answers(
        &self,
        question: &str,
        options: &QnAMakerOptions,
    ) -> Result<Vec<QueryResult>, QnAMakerError> {
        validate_options(options)?;
        if question.trim().is_empty() && options.qna_id.is_none() {
            return Err(QnAMakerError::EmptyQuestion);
        }

        info!(
            host = %self.endpoint.host,
            endpoint_key = %mask_key(&self.endpoint.endpoint_key),
            top = options.top,
            score_threshold = options.score_threshold,
            qna_id = ?options.qna_id,
            has_context = options.context.is_some(),
            "step: QnA Maker generateAnswer request"
        );

        let request = GenerateAnswerRequest {
            question,
            top: options.top,
            score_threshold: threshold_percent(options.score_threshold),
            strict_filters: &options.strict_filters,
            context: options.context.as_ref(),
            qna_id: options.qna_id,
            is_test: options.is_test,
            ranker_type: options.ranker_type.as_deref(),
        };
        if let Ok(json) = serde_json::to_string(&request) {
            debug!(request_json = %json, "QnA Maker generateAnswer request JSON");
        }

        let response = self
            .http
            .post(self.endpoint.generate_answer_url())
            .header("Authorization", self.authorization())
            .json(&request)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let body: GenerateAnswerResponse = response.json().await?;

        let mut answers: Vec<QueryResult> = body
            .answers
            .into_iter()
            .filter(|a| a.id != -1 && !a.answer.trim().is_empty())
            .map(|mut a| {
                a.score /= 100.0;
                a
            })
            .filter(|a| a.score >= options.score_threshold)
            .collect();
        answers.sort_by(|a, b| b.score.total_cmp(&a.score));

        info!(
            answer_count = answers.len(),
            top_score = ?answers.first().map(|a| a.score),
            "step: QnA Maker generateAnswer done"
        );
        Ok(answers)
    }

    #[instrument(skip(self, records), fields(kb = %self.endpoint.knowledge_base_id))]
    async fn call_train(&self, records: &[FeedbackRecord]) -> Result<(), QnAMakerError> {
        if records.is_empty() {
            return Ok(());
        }
        info!(
            record_count = records.len(),
            endpoint_key = %mask_key(&self.endpoint.endpoint_key),
            "step: QnA Maker train request"
        );

        let response = self
            .http
            .post(self.endpoint.train_url())
            .header("Authorization", self.authorization())
            .json(&TrainRequest {
                feedback_records: records,
            })
            .send()
            .await?;
        Self::check_status(response).await?;

        info!("step: QnA Maker train done");
        Ok(())
    }
}
