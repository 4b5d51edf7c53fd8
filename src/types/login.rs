use serde::{Deserialize, Serialize};

use crate::types::ApiStatus;

/// Request body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    /// Email address identifying the user.
    pub user_email: String,
}

impl LoginRequest {
    /// Create a new `LoginRequest` for the given email.
    pub fn new(user_email: impl Into<String>) -> Self {
        Self {
            user_email: user_email.into(),
        }
    }
}

/// Response body for `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// Outcome of the login attempt.
    pub status: ApiStatus,

    /// Human-readable description of the outcome.
    #[serde(default)]
    pub message: String,

    /// Bearer token for subsequent requests; absent on failure.
    #[serde(default)]
    pub user_token: Option<String>,

    /// Whether the user holds admin privileges; absent on failure.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl LoginResponse {
    /// Synthesize the uniform failure response used when the exchange never
    /// produced a usable backend payload.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Fail,
            message: message.into(),
            user_token: None,
            is_admin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_payload() {
        let json = r#"{"status":"success","message":"ok","user_token":"T1","is_admin":true}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.status.is_success());
        assert_eq!(response.user_token.as_deref(), Some("T1"));
        assert_eq!(response.is_admin, Some(true));
    }

    #[test]
    fn parses_failure_with_null_fields() {
        let json = r#"{"status":"fail","message":"unknown user","user_token":null,"is_admin":null}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(!response.status.is_success());
        assert!(response.user_token.is_none());
        assert!(response.is_admin.is_none());
    }

    #[test]
    fn synthesized_failure_shape() {
        let response = LoginResponse::failure("Login failed: connection refused");
        assert_eq!(response.status, ApiStatus::Fail);
        assert!(response.user_token.is_none());
        assert!(response.is_admin.is_none());
    }
}
