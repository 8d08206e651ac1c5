//! Outbound transport abstraction.
//!
//! [`Bot`] is transport-agnostic: qna-bot's connector client posts to the channel service,
//! tests substitute a recording implementation.

use crate::error::{BotError, Result};
use crate::types::{Activity, ResourceResponse};
use async_trait::async_trait;

/// Delivers outbound activities. Addressing (service url, conversation, reply-to id) is read
/// from the activity itself, so one implementation serves every conversation.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends one activity and returns the id assigned by the channel (may be empty).
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse>;
}

/// Returns the conversation id an outbound activity is addressed to.
pub fn conversation_id_of(activity: &Activity) -> Result<&str> {
    activity
        .conversation
        .as_ref()
        .map(|c| c.id.as_str())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BotError::Bot("Outbound activity has no conversation id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConversationAccount;

    #[test]
    fn test_conversation_id_of_present() {
        let activity = Activity {
            conversation: Some(ConversationAccount::new("conv-1")),
            ..Default::default()
        };
        assert_eq!(conversation_id_of(&activity).unwrap(), "conv-1");
    }

    #[test]
    fn test_conversation_id_of_missing_or_empty() {
        assert!(conversation_id_of(&Activity::default()).is_err());
        let activity = Activity {
            conversation: Some(ConversationAccount::new("")),
            ..Default::default()
        };
        assert!(conversation_id_of(&activity).is_err());
    }
}
