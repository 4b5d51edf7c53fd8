//! Configuration types for the chat front end.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for the REPL.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

/// Default path of the persisted-credentials file.
const DEFAULT_CREDENTIALS_FILE: &str = ".pergamum-credentials.json";

/// Command-line arguments for the pergamum-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend base URL (default: $PERGAMUM_BASE_URL)", "URL")]
    pub base_url: Option<String>,

    /// Email to log in with at startup.
    #[arrrg(optional, "Log in with this email at startup", "EMAIL")]
    pub email: Option<String>,

    /// Path of the persisted-credentials file.
    #[arrrg(
        optional,
        "Credentials file (default: .pergamum-credentials.json)",
        "FILE"
    )]
    pub credentials: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat run.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Backend base URL; when absent the client falls back to the
    /// PERGAMUM_BASE_URL environment variable.
    pub base_url: Option<String>,

    /// Email to log in with at startup, if any.
    pub email: Option<String>,

    /// Path of the persisted-credentials file.
    pub credentials_path: PathBuf,

    /// Optional request timeout. The default carries none; a hung request
    /// hangs its operation.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    pub fn new() -> Self {
        Self {
            base_url: None,
            email: None,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            timeout: None,
            use_color: true,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the startup login email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the credentials file path.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            base_url: args.base_url,
            email: args.email,
            credentials_path: args
                .credentials
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE)),
            timeout: args.timeout.map(Duration::from_secs),
            use_color: !args.no_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChatConfig::new();
        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert!(config.use_color);
        assert_eq!(
            config.credentials_path,
            PathBuf::from(DEFAULT_CREDENTIALS_FILE)
        );
    }

    #[test]
    fn from_args() {
        let args = ChatArgs {
            base_url: Some("https://papers.example.com".to_string()),
            email: Some("a@b.com".to_string()),
            credentials: Some("/tmp/creds.json".to_string()),
            timeout: Some(30),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(
            config.base_url.as_deref(),
            Some("https://papers.example.com")
        );
        assert_eq!(config.email.as_deref(), Some("a@b.com"));
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/creds.json"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert!(!config.use_color);
    }
}
