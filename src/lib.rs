// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod conversation;
pub mod directory;
pub mod error;
pub mod observability;
pub mod render;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports
pub use auth::AuthSession;
pub use client::Pergamum;
pub use client_logger::ClientLogger;
pub use conversation::Conversation;
pub use directory::Directory;
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use storage::{JsonFileStorage, MemoryStorage, StorageBackend};
pub use types::*;
