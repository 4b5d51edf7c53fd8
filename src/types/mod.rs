// Public modules
pub mod add_user;
pub mod agent_message;
pub mod api_status;
pub mod chat_message;
pub mod delete_session;
pub mod login;
pub mod status_response;

// Re-exports
pub use add_user::AddUserRequest;
pub use agent_message::{AgentMessageRequest, AgentMessageResponse};
pub use api_status::ApiStatus;
pub use chat_message::ChatMessage;
pub use delete_session::DeleteSessionRequest;
pub use login::{LoginRequest, LoginResponse};
pub use status_response::StatusResponse;
