//! Activity: the JSON payload exchanged with the channel service on every turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::account::{ChannelAccount, ConversationAccount};

/// Activity type names used on the wire. Unrecognized types deserialize as [`ActivityType::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    #[default]
    Message,
    ConversationUpdate,
    Trace,
    Typing,
    EndOfConversation,
    Event,
    Invoke,
    #[serde(other)]
    Other,
}

/// Button shown to the user; `imBack` posts `value` back as a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub title: String,
    pub value: String,
}

impl CardAction {
    pub fn im_back(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            action_type: "imBack".to_string(),
            value: title.clone(),
            title,
        }
    }
}

/// Quick-reply buttons attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedActions {
    #[serde(default)]
    pub actions: Vec<CardAction>,
}

/// A single inbound or outbound activity. Only `type` is required on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<SuggestedActions>,
}

impl Activity {
    /// Plain text message; addressing is filled in when sent through a turn.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            activity_type: ActivityType::Message,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Text message with one `imBack` suggested action per title.
    pub fn message_with_suggestions<I, S>(text: impl Into<String>, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let actions = titles.into_iter().map(CardAction::im_back).collect();
        Self {
            suggested_actions: Some(SuggestedActions { actions }),
            ..Self::message(text)
        }
    }

    /// Diagnostic trace activity (only rendered by the emulator).
    pub fn trace(
        name: impl Into<String>,
        value: Value,
        value_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            activity_type: ActivityType::Trace,
            timestamp: Some(Utc::now()),
            name: Some(name.into()),
            value: Some(value),
            value_type: Some(value_type.into()),
            label: Some(label.into()),
            ..Default::default()
        }
    }

    /// Addresses `self` as a reply to `incoming`: same channel, service and conversation,
    /// sender and recipient swapped, `reply_to_id` set to the incoming id.
    pub fn apply_conversation_reference(&mut self, incoming: &Activity) {
        self.channel_id = incoming.channel_id.clone();
        self.service_url = incoming.service_url.clone();
        self.conversation = incoming.conversation.clone();
        self.from = incoming.recipient.clone();
        self.recipient = incoming.from.clone();
        self.reply_to_id = incoming.id.clone();
        if self.locale.is_none() {
            self.locale = incoming.locale.clone();
        }
    }

    pub fn is_message(&self) -> bool {
        self.activity_type == ActivityType::Message
    }

    /// Message text with surrounding whitespace removed; `None` when absent or blank.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation
            .as_ref()
            .map(|c| c.id.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn from_id(&self) -> Option<&str> {
        self.from
            .as_ref()
            .map(|a| a.id.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn recipient_id(&self) -> Option<&str> {
        self.recipient
            .as_ref()
            .map(|a| a.id.as_str())
            .filter(|s| !s.is_empty())
    }
}
