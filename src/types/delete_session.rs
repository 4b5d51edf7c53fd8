use serde::{Deserialize, Serialize};

/// Request body for `DELETE /delete_session`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteSessionRequest {
    /// Email address of the authenticated user.
    pub user_email: String,

    /// The session identifier to delete.
    pub session_id: String,
}

impl DeleteSessionRequest {
    /// Create a new `DeleteSessionRequest`.
    pub fn new(user_email: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
            session_id: session_id.into(),
        }
    }
}
