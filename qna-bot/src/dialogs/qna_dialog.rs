//! # QnA Maker dialog
//!
//! Answers each message from the knowledge base. Besides the plain question/answer path it
//! handles multi-turn follow-up prompts and active learning:
//!
//! - answers carrying follow-up prompts are sent with one suggested action per prompt, and
//!   the answer id/query are kept as context for the next query
//! - when several answers score close together the user is asked "Did you mean:" and their
//!   pick is sent back to the service as training feedback

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use bot_core::{Activity, BotError, Result, TurnContext};
use bot_state::StatePropertyAccessor;
use qnamaker_client::{
    get_low_score_variation, FeedbackRecord, QnAMaker, QnAMakerOptions, QnAPrompt,
    QnARequestContext, QueryResult,
};

use super::Dialog;

const DEFAULT_TOP: usize = 3;
const DEFAULT_THRESHOLD: f32 = 0.3;
const DEFAULT_NO_ANSWER: &str = "No QnAMaker answers found.";
const DEFAULT_CARD_TITLE: &str = "Did you mean:";
const DEFAULT_CARD_NO_MATCH_TEXT: &str = "None of the above.";
const DEFAULT_CARD_NO_MATCH_RESPONSE: &str = "Thanks for the feedback.";

/// Texts and query settings of [`QnAMakerDialog`].
#[derive(Debug, Clone, PartialEq)]
pub struct QnADialogOptions {
    pub top: usize,
    pub score_threshold: f32,
    pub no_answer: String,
    pub active_learning_card_title: String,
    pub card_no_match_text: String,
    pub card_no_match_response: String,
    pub active_learning: bool,
}

impl Default for QnADialogOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            score_threshold: DEFAULT_THRESHOLD,
            no_answer: DEFAULT_NO_ANSWER.to_string(),
            active_learning_card_title: DEFAULT_CARD_TITLE.to_string(),
            card_no_match_text: DEFAULT_CARD_NO_MATCH_TEXT.to_string(),
            card_no_match_response: DEFAULT_CARD_NO_MATCH_RESPONSE.to_string(),
            active_learning: true,
        }
    }
}

impl QnADialogOptions {
    /// Defaults with the no-answer text replaced when `default_answer` is set.
    pub fn with_default_answer(default_answer: Option<&str>) -> Self {
        let mut options = Self::default();
        if let Some(answer) = default_answer {
            options.no_answer = answer.to_string();
        }
        options
    }
}

/// One "Did you mean" candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub question: String,
    pub qna_id: i64,
}

/// Conversation-scoped dialog state carried between turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_qna_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_user_query: Option<String>,
    /// Follow-up prompts offered with the last answer.
    #[serde(default)]
    pub prompts: Vec<QnAPrompt>,
    /// Active-learning candidates offered last turn.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    /// The question the candidates were offered for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_query: Option<String>,
}

impl DialogState {
    fn context(&self) -> Option<QnARequestContext> {
        self.previous_qna_id.map(|id| QnARequestContext {
            previous_qna_id: id,
            previous_user_query: self.previous_user_query.clone().unwrap_or_default(),
        })
    }
}

/// What the current message asks for, given last turn's state.
enum Query {
    Text,
    ById(i64),
}

/// Dialog that answers message turns from a QnA Maker knowledge base.
pub struct QnAMakerDialog {
    qna: Arc<dyn QnAMaker>,
    options: QnADialogOptions,
}

impl QnAMakerDialog {
    pub fn new(qna: Arc<dyn QnAMaker>, options: QnADialogOptions) -> Self {
        Self { qna, options }
    }

    pub fn options(&self) -> &QnADialogOptions {
        &self.options
    }

    fn query_options(&self, state: &DialogState, qna_id: Option<i64>) -> QnAMakerOptions {
        QnAMakerOptions {
            top: self.options.top,
            score_threshold: self.options.score_threshold,
            context: state.context(),
            qna_id,
            ..Default::default()
        }
    }

    /// Sends the selected candidate back to the service. Failures are logged, not fatal.
    async fn train(&self, ctx: &TurnContext, question: &str, qna_id: i64) {
        let record = FeedbackRecord {
            user_id: ctx.activity().from_id().unwrap_or_default().to_string(),
            user_question: question.to_string(),
            qna_id,
        };
        if let Err(e) = self.qna.call_train(&[record]).await {
            warn!(error = %e, qna_id = qna_id, "step: QnA dialog train feedback failed");
        }
    }

    async fn send_answer(
        &self,
        ctx: &TurnContext,
        text: &str,
        top: &QueryResult,
        state: &mut DialogState,
    ) -> Result<()> {
        let prompts = top.prompts();
        if prompts.is_empty() {
            ctx.send_activity(&top.answer).await?;
            *state = DialogState::default();
            return Ok(());
        }

        let titles: Vec<String> = prompts.iter().map(|p| p.display_text.clone()).collect();
        ctx.send(Activity::message_with_suggestions(top.answer.clone(), titles))
            .await?;
        *state = DialogState {
            previous_qna_id: Some(top.id),
            previous_user_query: Some(text.to_string()),
            prompts,
            ..Default::default()
        };
        Ok(())
    }

    async fn send_suggestions(
        &self,
        ctx: &TurnContext,
        text: &str,
        candidates: &[QueryResult],
        state: &mut DialogState,
    ) -> Result<()> {
        let suggestions: Vec<Suggestion> = candidates
            .iter()
            .filter_map(|c| {
                c.questions.first().map(|q| Suggestion {
                    question: q.clone(),
                    qna_id: c.id,
                })
            })
            .collect();

        let mut titles: Vec<String> = suggestions.iter().map(|s| s.question.clone()).collect();
        titles.push(self.options.card_no_match_text.clone());
        ctx.send(Activity::message_with_suggestions(
            self.options.active_learning_card_title.clone(),
            titles,
        ))
        .await?;

        state.prompts.clear();
        state.suggestions = suggestions;
        state.suggestion_query = Some(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl Dialog for QnAMakerDialog {
    #[instrument(skip(self, ctx, state), fields(conversation_id = ?ctx.activity().conversation_id()))]
    async fn run(
        &self,
        ctx: &TurnContext,
        state: &StatePropertyAccessor<DialogState>,
    ) -> Result<()> {
        let Some(text) = ctx.activity().trimmed_text().map(str::to_string) else {
            info!("step: QnA dialog skipped, message has no text");
            return Ok(());
        };
        let mut dialog_state = state.get_or_default(ctx).await?;
        let folded = text.to_lowercase();

        let mut query = Query::Text;
        let mut allow_suggestions = self.options.active_learning;

        if !dialog_state.suggestions.is_empty() {
            if self.options.card_no_match_text.to_lowercase() == folded {
                info!("step: QnA dialog user rejected all suggestions");
                ctx.send_activity(&self.options.card_no_match_response).await?;
                state.set(ctx, &DialogState::default()).await?;
                return Ok(());
            }

            let chosen = dialog_state
                .suggestions
                .iter()
                .find(|s| s.question.to_lowercase() == folded)
                .cloned();
            let original_query = dialog_state.suggestion_query.take().unwrap_or_default();
            dialog_state.suggestions.clear();

            if let Some(chosen) = chosen {
                info!(qna_id = chosen.qna_id, "step: QnA dialog suggestion chosen");
                self.train(ctx, &original_query, chosen.qna_id).await;
                query = Query::ById(chosen.qna_id);
                allow_suggestions = false;
            }
        } else if let Some(prompt) = dialog_state
            .prompts
            .iter()
            .find(|p| p.display_text.to_lowercase() == folded)
        {
            info!(qna_id = prompt.qna_id, "step: QnA dialog follow-up prompt chosen");
            query = Query::ById(prompt.qna_id);
            allow_suggestions = false;
        }

        let qna_id = match query {
            Query::Text => None,
            Query::ById(id) => Some(id),
        };
        let options = self.query_options(&dialog_state, qna_id);
        let results = self
            .qna
            .get_answers(&text, &options)
            .await
            .map_err(|e| BotError::QnAMaker(e.to_string()))?;

        info!(result_count = results.len(), "step: QnA dialog answers received");

        if results.is_empty() {
            ctx.send_activity(&self.options.no_answer).await?;
            state.set(ctx, &DialogState::default()).await?;
            return Ok(());
        }

        let candidates = if allow_suggestions {
            get_low_score_variation(&results)
        } else {
            Vec::new()
        };

        if candidates.len() > 1 {
            info!(candidate_count = candidates.len(), "step: QnA dialog offering suggestions");
            self.send_suggestions(ctx, &text, &candidates, &mut dialog_state)
                .await?;
        } else {
            self.send_answer(ctx, &text, &results[0], &mut dialog_state)
                .await?;
        }

        state.set(ctx, &dialog_state).await?;
        Ok(())
    }
}
