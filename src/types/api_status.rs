use serde::{Deserialize, Serialize};

/// Outcome marker carried by every backend response payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    /// The operation succeeded.
    Success,

    /// The operation failed; the accompanying message describes why.
    Fail,
}

impl ApiStatus {
    /// Returns true if this status marks a successful operation.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiStatus::Success)
    }
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiStatus::Success => write!(f, "success"),
            ApiStatus::Fail => write!(f, "fail"),
        }
    }
}
