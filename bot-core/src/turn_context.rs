//! Per-turn context: the incoming activity, the outbound transport, and the turn-state cache
//! that bot-state loads into and saves from.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::bot::Bot;
use crate::error::Result;
use crate::types::{Activity, ActivityType, ResourceResponse};

/// Property name the storage layer uses for optimistic concurrency; excluded from change detection.
pub const ETAG_PROPERTY: &str = "eTag";

/// A state object loaded for this turn plus the snapshot used to detect changes at save time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedState {
    pub state: Map<String, Value>,
    pub hash: String,
}

impl CachedState {
    /// Wraps freshly loaded state; the current content becomes the baseline.
    pub fn new(state: Map<String, Value>) -> Self {
        let hash = Self::compute_hash(&state);
        Self { state, hash }
    }

    /// Serialized form of `state` without the eTag. serde_json maps are ordered, so equal
    /// objects always produce equal strings.
    pub fn compute_hash(state: &Map<String, Value>) -> String {
        let mut copy = state.clone();
        copy.remove(ETAG_PROPERTY);
        Value::Object(copy).to_string()
    }

    pub fn is_changed(&self) -> bool {
        Self::compute_hash(&self.state) != self.hash
    }
}

/// Everything a handler needs for one turn.
pub struct TurnContext {
    activity: Activity,
    bot: Arc<dyn Bot>,
    turn_state: Mutex<HashMap<String, CachedState>>,
    responded: AtomicBool,
}

impl TurnContext {
    pub fn new(activity: Activity, bot: Arc<dyn Bot>) -> Self {
        Self {
            activity,
            bot,
            turn_state: Mutex::new(HashMap::new()),
            responded: AtomicBool::new(false),
        }
    }

    /// The incoming activity for this turn.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// True once a non-trace activity has been sent during this turn.
    pub fn responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Sends a plain text message as a reply to the incoming activity.
    pub async fn send_activity(&self, text: &str) -> Result<ResourceResponse> {
        self.send(Activity::message(text)).await
    }

    /// Addresses `activity` as a reply to the incoming activity and sends it.
    #[instrument(skip(self, activity), fields(activity_type = ?activity.activity_type))]
    pub async fn send(&self, mut activity: Activity) -> Result<ResourceResponse> {
        activity.apply_conversation_reference(&self.activity);
        debug!(
            conversation_id = ?activity.conversation_id(),
            reply_to_id = ?activity.reply_to_id,
            "step: sending activity"
        );
        let response = self.bot.send_activity(&activity).await?;
        if activity.activity_type != ActivityType::Trace {
            self.responded.store(true, Ordering::SeqCst);
        }
        Ok(response)
    }

    /// Sends a diagnostic trace activity.
    pub async fn send_trace_activity(
        &self,
        name: &str,
        value: Value,
        value_type: &str,
        label: &str,
    ) -> Result<ResourceResponse> {
        self.send(Activity::trace(name, value, value_type, label))
            .await
    }

    /// Returns a copy of the cached state stored under `key`, if loaded this turn.
    pub async fn cached_state(&self, key: &str) -> Option<CachedState> {
        self.turn_state.lock().await.get(key).cloned()
    }

    pub async fn set_cached_state(&self, key: &str, state: CachedState) {
        self.turn_state.lock().await.insert(key.to_string(), state);
    }

    /// Applies `f` to the cached state under `key`; returns `None` when nothing is cached.
    pub async fn update_cached_state<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut CachedState) -> R,
    ) -> Option<R> {
        self.turn_state.lock().await.get_mut(key).map(f)
    }

    pub async fn remove_cached_state(&self, key: &str) -> Option<CachedState> {
        self.turn_state.lock().await.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelAccount, ConversationAccount};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct RecordingBot {
        sent: StdMutex<Vec<Activity>>,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
            self.sent.lock().unwrap().push(activity.clone());
            Ok(ResourceResponse::default())
        }
    }

    fn incoming() -> Activity {
        Activity {
            id: Some("in-1".to_string()),
            channel_id: Some("emulator".to_string()),
            from: Some(ChannelAccount::new("user-1")),
            recipient: Some(ChannelAccount::new("bot-1")),
            conversation: Some(ConversationAccount::new("conv-1")),
            ..Activity::message("hello")
        }
    }

    #[tokio::test]
    async fn test_send_activity_addresses_reply_and_marks_responded() {
        let bot = Arc::new(RecordingBot::default());
        let ctx = TurnContext::new(incoming(), bot.clone());
        assert!(!ctx.responded());

        ctx.send_activity("world").await.unwrap();

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text.as_deref(), Some("world"));
        assert_eq!(sent[0].recipient_id(), Some("user-1"));
        assert_eq!(sent[0].reply_to_id.as_deref(), Some("in-1"));
        assert!(ctx.responded());
    }

    #[tokio::test]
    async fn test_trace_does_not_mark_responded() {
        let bot = Arc::new(RecordingBot::default());
        let ctx = TurnContext::new(incoming(), bot.clone());

        ctx.send_trace_activity("name", json!("value"), "type", "label")
            .await
            .unwrap();

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent[0].activity_type, ActivityType::Trace);
        assert_eq!(sent[0].label.as_deref(), Some("label"));
        assert!(!ctx.responded());
    }

    #[tokio::test]
    async fn test_cached_state_round_trip_and_change_detection() {
        let ctx = TurnContext::new(incoming(), Arc::new(RecordingBot::default()));
        let mut state = Map::new();
        state.insert("eTag".to_string(), json!("1"));
        ctx.set_cached_state("ConversationState", CachedState::new(state))
            .await;

        let unchanged = ctx.cached_state("ConversationState").await.unwrap();
        assert!(!unchanged.is_changed());

        ctx.update_cached_state("ConversationState", |c| {
            c.state.insert("eTag".to_string(), json!("2"));
        })
        .await;
        assert!(!ctx.cached_state("ConversationState").await.unwrap().is_changed());

        ctx.update_cached_state("ConversationState", |c| {
            c.state.insert("count".to_string(), json!(1));
        })
        .await;
        assert!(ctx.cached_state("ConversationState").await.unwrap().is_changed());

        assert!(ctx.remove_cached_state("ConversationState").await.is_some());
        assert!(ctx.cached_state("ConversationState").await.is_none());
    }
}
