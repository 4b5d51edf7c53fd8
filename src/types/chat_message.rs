use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single entry in a conversation transcript.
///
/// Messages are immutable once created and are ordered by insertion in the
/// conversation history. Failed exchanges also appear as agent-authored
/// messages, so the transcript is always self-describing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The message text.
    pub text: String,

    /// True if the message was authored by the user, false for the agent.
    pub is_user: bool,

    /// When the message was appended to the transcript.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    /// Create a new `ChatMessage` stamped with the current time.
    pub fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            text: text.into(),
            is_user,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Create a new user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Create a new agent-authored message.
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}
