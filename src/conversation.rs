//! Conversation store: session identity plus the append-only transcript.
//!
//! A [`Conversation`] owns an opaque session identifier correlating it with
//! backend-side conversational state, and the ordered message history. The
//! backend is authoritative for session identity: any successful exchange
//! may carry a different identifier, which the store adopts.
//!
//! Failed exchanges become agent-authored transcript messages rather than
//! errors. The UI displays history verbatim, so the transcript is always
//! self-describing and a consumer never has to handle a failed send
//! separately.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::require_credentials;
use crate::client::Pergamum;
use crate::error::Result;
use crate::observability;
use crate::types::{
    AgentMessageRequest, AgentMessageResponse, ChatMessage, DeleteSessionRequest, StatusResponse,
};

/// Generate a locally-unique session identifier.
///
/// Timestamp plus random suffix; best-effort uniqueness, not
/// cryptographically guaranteed.
fn generate_session_id() -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", millis, &suffix[..12])
}

/// A conversation with the question-answering agent.
///
/// All mutating operations take `&mut self`, so at most one exchange per
/// conversation is in flight at a time; a shared deployment wraps the store
/// in an async mutex to keep that guarantee.
pub struct Conversation {
    client: Pergamum,
    session_id: String,
    history: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates an empty conversation with a freshly generated identifier.
    pub fn new(client: Pergamum) -> Self {
        Self {
            client,
            session_id: generate_session_id(),
            history: Vec::new(),
        }
    }

    /// Returns the current session identifier. Never empty.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Replace the session identifier.
    ///
    /// Debugging hook; `session_id` must be non-empty.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    /// Append a user-authored message stamped with the current time.
    pub fn add_user_message(&mut self, text: &str) {
        self.history.push(ChatMessage::user(text));
    }

    /// Relay a message to the agent and absorb the outcome into history.
    ///
    /// Missing email or token is a precondition failure returned as an
    /// authentication error before any request is issued. Otherwise the
    /// outcome, success or failure, always lands in the transcript: the
    /// agent's reply on success, a synthesized agent message describing the
    /// error on a fail status or transport failure. The backend response
    /// (or its synthesized stand-in) is returned either way.
    pub async fn send_to_agent(
        &mut self,
        text: &str,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<AgentMessageResponse> {
        let (email, token) = require_credentials(email, token)?;
        let request = AgentMessageRequest::new(email, self.session_id.clone(), text);
        let result = self.client.message_to_agent(token, &request).await;
        Ok(self.absorb_agent_result(result))
    }

    /// Append the user message, then relay it to the agent.
    pub async fn send_message(
        &mut self,
        text: &str,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<AgentMessageResponse> {
        self.add_user_message(text);
        self.send_to_agent(text, email, token).await
    }

    /// Apply an exchange outcome to session identity and history.
    fn absorb_agent_result(
        &mut self,
        result: Result<AgentMessageResponse>,
    ) -> AgentMessageResponse {
        match result {
            Ok(response) => {
                // The backend is authoritative for session identity.
                if let Some(session_id) = response.session_id.as_deref() {
                    if !session_id.is_empty() && session_id != self.session_id {
                        observability::SESSION_ID_MIGRATIONS.click();
                        self.session_id = session_id.to_string();
                    }
                }
                if response.status.is_success() {
                    self.history.push(ChatMessage::agent(&response.message));
                } else {
                    observability::TRANSCRIPT_ERROR_MESSAGES.click();
                    self.history.push(ChatMessage::agent(format!(
                        "Agent request failed: {}",
                        response.message
                    )));
                }
                response
            }
            Err(err) => {
                observability::TRANSCRIPT_ERROR_MESSAGES.click();
                let response = AgentMessageResponse::failure(
                    format!("Error communicating with agent: {err}"),
                    self.session_id.clone(),
                );
                self.history.push(ChatMessage::agent(&response.message));
                response
            }
        }
    }

    /// Delete the current session on the backend.
    ///
    /// Missing email or token is a precondition failure returned as an
    /// authentication error before any request is issued. On a success
    /// acknowledgement the identifier is replaced with a freshly generated
    /// one while history is preserved; on any failure both are left
    /// untouched. Returns the acknowledgement (or its synthesized
    /// stand-in); apart from the precondition, never an error.
    pub async fn delete_session(
        &mut self,
        email: Option<&str>,
        token: Option<&str>,
    ) -> Result<StatusResponse> {
        let (email, token) = require_credentials(email, token)?;
        let request = DeleteSessionRequest::new(email, self.session_id.clone());
        let result = self.client.delete_session(token, &request).await;
        Ok(self.absorb_delete_result(result))
    }

    /// Apply a session-deletion outcome.
    fn absorb_delete_result(&mut self, result: Result<StatusResponse>) -> StatusResponse {
        match result {
            Ok(response) => {
                if response.status.is_success() {
                    self.session_id = generate_session_id();
                }
                response
            }
            Err(err) => StatusResponse::failure(format!("Error deleting session: {err}")),
        }
    }

    /// Returns a snapshot of the transcript.
    ///
    /// Defensive copy; mutating the returned vector does not affect the
    /// conversation.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.history.clone()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Empty the transcript and generate a fresh session identifier.
    ///
    /// Used on logout.
    pub fn clear(&mut self) {
        self.history.clear();
        self.session_id = generate_session_id();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::ApiStatus;

    fn conversation() -> Conversation {
        let client = Pergamum::new(Some("https://papers.example.com".to_string())).unwrap();
        Conversation::new(client)
    }

    fn agent_success(message: &str, session_id: Option<&str>) -> AgentMessageResponse {
        AgentMessageResponse {
            status: ApiStatus::Success,
            message: message.to_string(),
            session_id: session_id.map(String::from),
        }
    }

    #[test]
    fn new_conversation_has_generated_session_id() {
        let conversation = conversation();
        assert!(conversation.session_id().starts_with("session_"));
        assert_eq!(conversation.message_count(), 0);
    }

    #[test]
    fn generated_session_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn history_is_insertion_ordered() {
        let mut conversation = conversation();
        conversation.add_user_message("what does the paper claim?");
        conversation.absorb_agent_result(Ok(agent_success("it claims X", None)));
        conversation.add_user_message("and the evidence?");
        conversation.absorb_agent_result(Ok(agent_success("three benchmarks", None)));

        let history = conversation.history();
        assert_eq!(history.len(), 4);
        assert!(history[0].is_user);
        assert!(!history[1].is_user);
        assert!(history[2].is_user);
        assert!(!history[3].is_user);
        assert_eq!(history[1].text, "it claims X");
        assert_eq!(history[3].text, "three benchmarks");
    }

    #[test]
    fn adopts_backend_session_id() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");

        let response = conversation.absorb_agent_result(Ok(agent_success("hello", Some("S2"))));
        assert!(response.status.is_success());
        assert_eq!(conversation.session_id(), "S2");

        let history = conversation.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "hello");
        assert!(!history[0].is_user);
    }

    #[test]
    fn ignores_absent_empty_or_equal_session_id() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");

        conversation.absorb_agent_result(Ok(agent_success("a", None)));
        assert_eq!(conversation.session_id(), "S1");

        conversation.absorb_agent_result(Ok(agent_success("b", Some(""))));
        assert_eq!(conversation.session_id(), "S1");

        conversation.absorb_agent_result(Ok(agent_success("c", Some("S1"))));
        assert_eq!(conversation.session_id(), "S1");
    }

    #[test]
    fn fail_status_becomes_transcript_message() {
        let mut conversation = conversation();
        let response = conversation.absorb_agent_result(Ok(AgentMessageResponse {
            status: ApiStatus::Fail,
            message: "agent unavailable".to_string(),
            session_id: None,
        }));

        assert!(!response.status.is_success());
        let history = conversation.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_user);
        assert!(history[0].text.contains("agent unavailable"));
    }

    #[test]
    fn transport_error_becomes_transcript_message() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");

        let response = conversation.absorb_agent_result(Err(Error::internal_server(
            "server exploded",
            None,
        )));

        assert_eq!(response.status, ApiStatus::Fail);
        assert_eq!(response.session_id.as_deref(), Some("S1"));
        let history = conversation.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_user);
        assert!(history[0].text.contains("Error communicating with agent"));
        assert!(history[0].text.contains("server exploded"));
    }

    #[test]
    fn delete_success_rotates_session_id_and_keeps_history() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");
        conversation.add_user_message("hi");

        let response = conversation.absorb_delete_result(Ok(StatusResponse {
            status: ApiStatus::Success,
            message: "deleted".to_string(),
        }));

        assert!(response.status.is_success());
        assert_ne!(conversation.session_id(), "S1");
        assert!(conversation.session_id().starts_with("session_"));
        assert_eq!(conversation.message_count(), 1);
    }

    #[test]
    fn delete_failure_leaves_state_untouched() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");
        conversation.add_user_message("hi");

        let response = conversation.absorb_delete_result(Ok(StatusResponse::failure("nope")));
        assert!(!response.status.is_success());
        assert_eq!(conversation.session_id(), "S1");
        assert_eq!(conversation.message_count(), 1);

        let response = conversation
            .absorb_delete_result(Err(Error::connection("connection refused", None)));
        assert!(!response.status.is_success());
        assert!(response.message.contains("Error deleting session"));
        assert_eq!(conversation.session_id(), "S1");
        assert_eq!(conversation.message_count(), 1);
    }

    #[test]
    fn clear_empties_history_and_rotates_session_id() {
        let mut conversation = conversation();
        let before = conversation.session_id().to_string();
        conversation.add_user_message("hi");
        conversation.absorb_agent_result(Ok(agent_success("hello", None)));

        conversation.clear();
        assert_eq!(conversation.message_count(), 0);
        assert_ne!(conversation.session_id(), before);
    }

    #[test]
    fn history_snapshot_is_defensive() {
        let mut conversation = conversation();
        conversation.add_user_message("hi");

        let mut snapshot = conversation.history();
        snapshot.push(ChatMessage::agent("forged"));
        snapshot[0].text = "mutated".to_string();

        assert_eq!(conversation.message_count(), 1);
        assert_eq!(conversation.history()[0].text, "hi");
    }

    #[test]
    fn send_without_credentials_is_rejected_before_network() {
        let mut conversation = conversation();
        conversation.add_user_message("hi");

        let err = tokio_test::block_on(conversation.send_to_agent("hi", None, None)).unwrap_err();
        assert!(err.is_authentication());
        // Nothing was appended for the rejected exchange.
        assert_eq!(conversation.message_count(), 1);

        let err =
            tokio_test::block_on(conversation.send_to_agent("hi", Some("a@b.com"), None))
                .unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn delete_without_credentials_is_rejected_before_network() {
        let mut conversation = conversation();
        conversation.set_session_id("S1");

        let err = tokio_test::block_on(conversation.delete_session(None, None)).unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(conversation.session_id(), "S1");
    }
}
