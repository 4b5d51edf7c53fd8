//! Directory operations: registering new authorized users.
//!
//! A stateless request/response mapper. Error collapsing mirrors the login
//! exchange: transport and parse failures become fail-status
//! acknowledgements, never errors.

use crate::auth::require_credentials;
use crate::client::Pergamum;
use crate::error::Result;
use crate::types::{AddUserRequest, StatusResponse};

/// Administrative directory operations.
pub struct Directory {
    client: Pergamum,
}

impl Directory {
    /// Creates a new directory handle.
    pub fn new(client: Pergamum) -> Self {
        Self { client }
    }

    /// Register a new authorized user.
    ///
    /// Missing caller email or token is a precondition failure returned as
    /// an authentication error before any request is issued. Otherwise
    /// returns the backend's acknowledgement verbatim, or a synthesized
    /// fail-status acknowledgement on any transport or parse error.
    pub async fn add_user(
        &self,
        current_user_email: Option<&str>,
        new_user_email: &str,
        is_admin: bool,
        token: Option<&str>,
    ) -> Result<StatusResponse> {
        let (email, token) = require_credentials(current_user_email, token)?;
        let request = AddUserRequest::new(email, new_user_email, is_admin);
        match self.client.add_user(token, &request).await {
            Ok(response) => Ok(response),
            Err(err) => Ok(StatusResponse::failure(format!("Error adding user: {err}"))),
        }
    }
}
