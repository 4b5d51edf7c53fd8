use serde::{Deserialize, Serialize};

use crate::types::ApiStatus;

/// Minimal `{status, message}` acknowledgement returned by the
/// session-deletion and user-registration endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    /// Outcome of the operation.
    pub status: ApiStatus,

    /// Human-readable description of the outcome.
    #[serde(default)]
    pub message: String,
}

impl StatusResponse {
    /// Synthesize the uniform failure acknowledgement.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Fail,
            message: message.into(),
        }
    }
}
