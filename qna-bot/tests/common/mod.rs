//! Shared fakes for qna-bot integration tests: a recording transport, a scripted QnA service,
//! a write-counting storage, and activity builders.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use bot_core::{
    Activity, ActivityType, Bot, ChannelAccount, ConversationAccount, ResourceResponse, Result,
};
use bot_state::{MemoryStorage, Storage, StorageError, StoreItem};
use qnamaker_client::{
    FeedbackRecord, QnAMaker, QnAMakerError, QnAMakerOptions, QnAPrompt, QnAResponseContext,
    QueryResult,
};

pub const USER_ID: &str = "user-1";
pub const BOT_ID: &str = "bot-1";
pub const CONVERSATION_ID: &str = "conv-1";
pub const CHANNEL_ID: &str = "emulator";

/// Records every outbound activity instead of posting it.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Activity>>,
}

impl RecordingBot {
    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|a| a.activity_type == ActivityType::Message)
            .filter_map(|a| a.text)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(activity.clone());
        Ok(ResourceResponse {
            id: format!("out-{}", sent.len()),
        })
    }
}

/// One scripted reply of [`FakeQnAMaker::get_answers`].
pub enum Scripted {
    Answers(Vec<QueryResult>),
    Fail(u16),
}

/// QnA service returning scripted replies in order and recording queries and feedback.
#[derive(Default)]
pub struct FakeQnAMaker {
    replies: Mutex<VecDeque<Scripted>>,
    queries: Mutex<Vec<(String, QnAMakerOptions)>>,
    trained: Mutex<Vec<FeedbackRecord>>,
}

impl FakeQnAMaker {
    pub fn new(replies: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    pub fn queries(&self) -> Vec<(String, QnAMakerOptions)> {
        self.queries.lock().unwrap().clone()
    }

    pub fn trained(&self) -> Vec<FeedbackRecord> {
        self.trained.lock().unwrap().clone()
    }
}

#[async_trait]
impl QnAMaker for FakeQnAMaker {
    async fn get_answers(
        &self,
        question: &str,
        options: &QnAMakerOptions,
    ) -> std::result::Result<Vec<QueryResult>, QnAMakerError> {
        self.queries
            .lock()
            .unwrap()
            .push((question.to_string(), options.clone()));
        match self.replies.lock().unwrap().pop_front() {
            Some(Scripted::Answers(answers)) => Ok(answers),
            Some(Scripted::Fail(status)) => Err(QnAMakerError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn call_train(&self, records: &[FeedbackRecord]) -> std::result::Result<(), QnAMakerError> {
        self.trained.lock().unwrap().extend_from_slice(records);
        Ok(())
    }
}

/// MemoryStorage wrapper counting writes per key.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: Mutex<HashMap<String, usize>>,
}

impl CountingStorage {
    pub fn writes_for(&self, key: &str) -> usize {
        self.writes.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_writes(&self) -> usize {
        self.writes.lock().unwrap().values().sum()
    }

    pub async fn read_one(&self, key: &str) -> Option<StoreItem> {
        self.inner
            .read(&[key.to_string()])
            .await
            .unwrap()
            .remove(key)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn read(
        &self,
        keys: &[String],
    ) -> std::result::Result<HashMap<String, StoreItem>, StorageError> {
        self.inner.read(keys).await
    }

    async fn write(
        &self,
        changes: HashMap<String, StoreItem>,
    ) -> std::result::Result<(), StorageError> {
        {
            let mut writes = self.writes.lock().unwrap();
            for key in changes.keys() {
                *writes.entry(key.clone()).or_insert(0) += 1;
            }
        }
        self.inner.write(changes).await
    }

    async fn delete(&self, keys: &[String]) -> std::result::Result<(), StorageError> {
        self.inner.delete(keys).await
    }
}

pub fn conversation_key() -> String {
    format!("{}/conversations/{}", CHANNEL_ID, CONVERSATION_ID)
}

pub fn user_key() -> String {
    format!("{}/users/{}", CHANNEL_ID, USER_ID)
}

fn addressed(activity: Activity) -> Activity {
    Activity {
        id: Some("in-1".to_string()),
        service_url: Some("http://localhost:5000".to_string()),
        channel_id: Some(CHANNEL_ID.to_string()),
        from: Some(ChannelAccount::with_name(USER_ID, "User")),
        recipient: Some(ChannelAccount::with_name(BOT_ID, "Bot")),
        conversation: Some(ConversationAccount::new(CONVERSATION_ID)),
        ..activity
    }
}

pub fn message(text: &str) -> Activity {
    addressed(Activity::message(text))
}

pub fn members_added(ids: &[&str]) -> Activity {
    addressed(Activity {
        activity_type: ActivityType::ConversationUpdate,
        members_added: ids.iter().map(|id| ChannelAccount::new(*id)).collect(),
        ..Default::default()
    })
}

pub fn answer(id: i64, question: &str, answer: &str, score: f32) -> QueryResult {
    serde_json::from_value(json!({
        "id": id,
        "questions": [question],
        "answer": answer,
        "score": score,
    }))
    .unwrap()
}

pub fn answer_with_prompts(id: i64, answer_text: &str, prompts: &[(i64, &str, i32)]) -> QueryResult {
    let mut result = answer(id, "question", answer_text, 0.9);
    result.context = Some(QnAResponseContext {
        is_context_only: false,
        prompts: prompts
            .iter()
            .map(|(qna_id, text, order)| QnAPrompt {
                display_order: *order,
                qna_id: *qna_id,
                display_text: text.to_string(),
            })
            .collect(),
    });
    result
}

/// Suggested-action titles of an outbound activity.
pub fn action_titles(activity: &Activity) -> Vec<String> {
    activity
        .suggested_actions
        .as_ref()
        .map(|s| s.actions.iter().map(|a| a.title.clone()).collect())
        .unwrap_or_default()
}
