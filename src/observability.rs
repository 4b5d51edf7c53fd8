use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("pergamum.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("pergamum.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("pergamum.client.request_duration_seconds");

pub(crate) static LOGIN_REQUESTS: Counter = Counter::new("pergamum.client.login_requests");
pub(crate) static AGENT_MESSAGE_REQUESTS: Counter =
    Counter::new("pergamum.client.agent_message_requests");
pub(crate) static SESSION_DELETE_REQUESTS: Counter =
    Counter::new("pergamum.client.session_delete_requests");
pub(crate) static ADD_USER_REQUESTS: Counter = Counter::new("pergamum.client.add_user_requests");

pub(crate) static SESSION_ID_MIGRATIONS: Counter =
    Counter::new("pergamum.conversation.session_id_migrations");
pub(crate) static TRANSCRIPT_ERROR_MESSAGES: Counter =
    Counter::new("pergamum.conversation.transcript_error_messages");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&LOGIN_REQUESTS);
    collector.register_counter(&AGENT_MESSAGE_REQUESTS);
    collector.register_counter(&SESSION_DELETE_REQUESTS);
    collector.register_counter(&ADD_USER_REQUESTS);

    collector.register_counter(&SESSION_ID_MIGRATIONS);
    collector.register_counter(&TRANSCRIPT_ERROR_MESSAGES);
}
