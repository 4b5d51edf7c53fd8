use serde::{Deserialize, Serialize};

use crate::types::ApiStatus;

/// Request body for `POST /message_to_agent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentMessageRequest {
    /// Email address of the authenticated user.
    pub user_email: String,

    /// Identifier correlating this exchange with backend conversation state.
    pub session_id: String,

    /// The user's message text.
    pub message_to_agent: String,
}

impl AgentMessageRequest {
    /// Create a new `AgentMessageRequest`.
    pub fn new(
        user_email: impl Into<String>,
        session_id: impl Into<String>,
        message_to_agent: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            session_id: session_id.into(),
            message_to_agent: message_to_agent.into(),
        }
    }
}

/// Response body for `POST /message_to_agent`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentMessageResponse {
    /// Outcome of the exchange.
    pub status: ApiStatus,

    /// The agent's reply on success, or a description of the failure.
    #[serde(default)]
    pub message: String,

    /// Session identifier the backend considers current. The backend is
    /// authoritative: a different non-empty value here replaces the
    /// client-side identifier.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl AgentMessageResponse {
    /// Synthesize the uniform failure response for an exchange that never
    /// produced a usable backend payload. Carries the session identifier
    /// that was current when the request was issued.
    pub fn failure(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Fail,
            message: message.into(),
            session_id: Some(session_id.into()),
        }
    }
}
