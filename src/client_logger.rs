//! Logging trait for Pergamum client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture and log all API interactions passing through the
//! [`Pergamum`](crate::Pergamum) client.

use crate::types::{AgentMessageResponse, LoginResponse, StatusResponse};

/// A trait for logging Pergamum client operations.
///
/// Implement this trait to capture and record all backend interactions.
/// Only successful HTTP exchanges reach the logger; transport failures are
/// reported through the error taxonomy instead.
///
/// # Example
///
/// ```rust,ignore
/// use pergamum::{AgentMessageResponse, ClientLogger, LoginResponse, StatusResponse};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_login_response(&self, response: &LoginResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "login: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_agent_response(&self, response: &AgentMessageResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "agent: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_ack_response(&self, response: &StatusResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "ack: {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log the response to a login exchange.
    fn log_login_response(&self, response: &LoginResponse);

    /// Log the response to a message-to-agent exchange.
    ///
    /// Called with the backend payload exactly as decoded, before the
    /// conversation store applies session-identifier migration.
    fn log_agent_response(&self, response: &AgentMessageResponse);

    /// Log a `{status, message}` acknowledgement from the session-deletion
    /// or user-registration endpoints.
    fn log_ack_response(&self, response: &StatusResponse);
}
