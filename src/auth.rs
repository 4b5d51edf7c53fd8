//! Identity store: the login/logout/restore lifecycle.
//!
//! [`AuthSession`] holds the authenticated identity (token, email, admin
//! flag) in memory and mirrors it into a [`StorageBackend`] so the identity
//! survives restarts. Login never surfaces an error to the caller: every
//! transport, protocol, or storage failure collapses into a fail-status
//! [`LoginResponse`] with a descriptive message.

use crate::client::Pergamum;
use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use crate::types::{ApiStatus, LoginRequest, LoginResponse};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "userToken";

/// Storage key for the authenticated email.
pub const EMAIL_KEY: &str = "userEmail";

/// Storage key for the stringified admin flag.
pub const ADMIN_KEY: &str = "isAdmin";

/// Check that both identity fields are present before a protected call.
///
/// Raised to the immediate caller; no request is issued. Empty strings
/// count as absent.
pub(crate) fn require_credentials<'a>(
    email: Option<&'a str>,
    token: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    let email = email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| Error::authentication("no user email; log in first"))?;
    let token = token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::authentication("no user token; log in first"))?;
    Ok((email, token))
}

/// The identity store.
///
/// Storage is touched only by [`login`](AuthSession::login) (writes) and
/// [`logout`](AuthSession::logout) (deletes);
/// [`restore_session`](AuthSession::restore_session) only reads.
pub struct AuthSession<S: StorageBackend> {
    client: Pergamum,
    storage: S,
    user_token: Option<String>,
    user_email: Option<String>,
    is_admin: bool,
}

impl<S: StorageBackend> AuthSession<S> {
    /// Creates an empty identity store.
    pub fn new(client: Pergamum, storage: S) -> Self {
        Self {
            client,
            storage,
            user_token: None,
            user_email: None,
            is_admin: false,
        }
    }

    /// Authenticate with the backend.
    ///
    /// On a success-status response carrying a non-empty token, the
    /// identity is recorded in memory and durable storage and the response
    /// is returned unchanged. Every failure (non-2xx status, transport
    /// error, malformed body, storage write error) is collapsed into a
    /// fail-status response; this method never returns an error.
    pub async fn login(&mut self, email: &str) -> LoginResponse {
        let request = LoginRequest::new(email);
        let response = match self.client.login(&request).await {
            Ok(response) => response,
            Err(err) => return LoginResponse::failure(format!("Login failed: {err}")),
        };
        match self.apply_login_response(email, response) {
            Ok(response) => response,
            Err(err) => LoginResponse::failure(format!("Login failed: {err}")),
        }
    }

    /// Record a login exchange.
    ///
    /// Responses without a success status or without a non-empty token
    /// change nothing and are returned unchanged. Durable storage is
    /// written before the in-memory identity so a write failure never
    /// leaves memory claiming an identity storage does not hold.
    fn apply_login_response(
        &mut self,
        email: &str,
        response: LoginResponse,
    ) -> Result<LoginResponse> {
        let token = response.user_token.clone().unwrap_or_default();
        if response.status != ApiStatus::Success || token.is_empty() {
            return Ok(response);
        }
        let is_admin = response.is_admin.unwrap_or(false);

        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.set(EMAIL_KEY, email)?;
        self.storage
            .set(ADMIN_KEY, if is_admin { "true" } else { "false" })?;

        self.user_token = Some(token);
        self.user_email = Some(email.to_string());
        self.is_admin = is_admin;
        Ok(response)
    }

    /// Clear the identity in memory and durable storage.
    ///
    /// The in-memory identity is cleared unconditionally, before the
    /// storage deletes. Idempotent.
    pub fn logout(&mut self) -> Result<()> {
        self.user_token = None;
        self.user_email = None;
        self.is_admin = false;

        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(EMAIL_KEY)?;
        self.storage.remove(ADMIN_KEY)?;
        Ok(())
    }

    /// Repopulate the identity from durable storage.
    ///
    /// Returns true only when both token and email are present and
    /// non-empty; there is no partial restoration. An absent or malformed
    /// admin flag restores as false.
    pub fn restore_session(&mut self) -> Result<bool> {
        let token = self.storage.get(TOKEN_KEY)?;
        let email = self.storage.get(EMAIL_KEY)?;
        let is_admin = self.storage.get(ADMIN_KEY)?;

        match (token, email) {
            (Some(token), Some(email)) if !token.is_empty() && !email.is_empty() => {
                self.user_token = Some(token);
                self.user_email = Some(email);
                self.is_admin = is_admin.as_deref() == Some("true");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Returns the bearer token, if authenticated.
    pub fn token(&self) -> Option<&str> {
        self.user_token.as_deref()
    }

    /// Returns the authenticated email, if any.
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// Returns true if the authenticated user holds admin privileges.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns true if a token is present.
    pub fn is_logged_in(&self) -> bool {
        self.user_token.is_some()
    }

    /// Returns `(email, token)` when both are present, for protected
    /// operations.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user_email.as_deref(), self.user_token.as_deref()) {
            (Some(email), Some(token)) => Some((email, token)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> AuthSession<MemoryStorage> {
        let client = Pergamum::new(Some("https://papers.example.com".to_string())).unwrap();
        AuthSession::new(client, MemoryStorage::new())
    }

    fn success_response(token: &str, is_admin: bool) -> LoginResponse {
        LoginResponse {
            status: ApiStatus::Success,
            message: "ok".to_string(),
            user_token: Some(token.to_string()),
            is_admin: Some(is_admin),
        }
    }

    #[test]
    fn login_success_populates_identity_and_storage() {
        let mut auth = session();
        let response = auth
            .apply_login_response("a@b.com", success_response("T1", true))
            .unwrap();

        assert!(response.status.is_success());
        assert!(auth.is_logged_in());
        assert!(auth.is_admin());
        assert_eq!(auth.token(), Some("T1"));
        assert_eq!(auth.user_email(), Some("a@b.com"));
        assert_eq!(auth.credentials(), Some(("a@b.com", "T1")));

        assert_eq!(auth.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("T1"));
        assert_eq!(
            auth.storage.get(EMAIL_KEY).unwrap().as_deref(),
            Some("a@b.com")
        );
        assert_eq!(
            auth.storage.get(ADMIN_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn login_failure_changes_nothing() {
        let mut auth = session();
        let response = auth
            .apply_login_response("a@b.com", LoginResponse::failure("unknown user"))
            .unwrap();

        assert!(!response.status.is_success());
        assert!(!auth.is_logged_in());
        assert_eq!(auth.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn login_success_without_token_changes_nothing() {
        let mut auth = session();
        let response = success_response("", false);
        let returned = auth.apply_login_response("a@b.com", response).unwrap();
        assert!(returned.status.is_success());
        assert!(!auth.is_logged_in());

        let mut response = success_response("T1", false);
        response.user_token = None;
        auth.apply_login_response("a@b.com", response).unwrap();
        assert!(!auth.is_logged_in());
        assert_eq!(auth.storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn missing_admin_flag_defaults_to_false() {
        let mut auth = session();
        let mut response = success_response("T1", true);
        response.is_admin = None;
        auth.apply_login_response("a@b.com", response).unwrap();
        assert!(auth.is_logged_in());
        assert!(!auth.is_admin());
        assert_eq!(
            auth.storage.get(ADMIN_KEY).unwrap().as_deref(),
            Some("false")
        );
    }

    #[test]
    fn logout_clears_identity_and_storage() {
        let mut auth = session();
        auth.apply_login_response("a@b.com", success_response("T1", true))
            .unwrap();

        auth.logout().unwrap();
        assert!(!auth.is_logged_in());
        assert!(!auth.is_admin());
        assert_eq!(auth.user_email(), None);
        assert_eq!(auth.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(auth.storage.get(EMAIL_KEY).unwrap(), None);
        assert_eq!(auth.storage.get(ADMIN_KEY).unwrap(), None);

        // Idempotent.
        auth.logout().unwrap();
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn restore_requires_both_token_and_email() {
        // All four presence combinations; only token+email restores.
        for (token, email, expected) in [
            (Some("T1"), Some("a@b.com"), true),
            (Some("T1"), None, false),
            (None, Some("a@b.com"), false),
            (None, None, false),
        ] {
            let mut auth = session();
            if let Some(token) = token {
                auth.storage.set(TOKEN_KEY, token).unwrap();
            }
            if let Some(email) = email {
                auth.storage.set(EMAIL_KEY, email).unwrap();
            }

            let restored = auth.restore_session().unwrap();
            assert_eq!(restored, expected, "token={token:?} email={email:?}");
            assert_eq!(auth.is_logged_in(), expected);
            if !expected {
                assert_eq!(auth.token(), None);
                assert_eq!(auth.user_email(), None);
            }
        }
    }

    #[test]
    fn restore_treats_empty_values_as_absent() {
        let mut auth = session();
        auth.storage.set(TOKEN_KEY, "").unwrap();
        auth.storage.set(EMAIL_KEY, "a@b.com").unwrap();
        assert!(!auth.restore_session().unwrap());
        assert!(!auth.is_logged_in());
    }

    #[test]
    fn restore_admin_flag_parsing() {
        for (stored, expected) in [
            (Some("true"), true),
            (Some("false"), false),
            (Some("yes"), false),
            (None, false),
        ] {
            let mut auth = session();
            auth.storage.set(TOKEN_KEY, "T1").unwrap();
            auth.storage.set(EMAIL_KEY, "a@b.com").unwrap();
            if let Some(stored) = stored {
                auth.storage.set(ADMIN_KEY, stored).unwrap();
            }
            assert!(auth.restore_session().unwrap());
            assert_eq!(auth.is_admin(), expected, "stored={stored:?}");
        }
    }

    #[test]
    fn relogin_replaces_identity() {
        let mut auth = session();
        auth.apply_login_response("a@b.com", success_response("T1", true))
            .unwrap();
        auth.apply_login_response("c@d.com", success_response("T2", false))
            .unwrap();

        assert_eq!(auth.credentials(), Some(("c@d.com", "T2")));
        assert!(!auth.is_admin());
        assert_eq!(auth.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("T2"));
    }

    #[test]
    fn require_credentials_rejects_missing_fields() {
        assert!(require_credentials(Some("a@b.com"), Some("T1")).is_ok());
        assert!(
            require_credentials(None, Some("T1"))
                .unwrap_err()
                .is_authentication()
        );
        assert!(
            require_credentials(Some("a@b.com"), None)
                .unwrap_err()
                .is_authentication()
        );
        assert!(
            require_credentials(Some("a@b.com"), Some(""))
                .unwrap_err()
                .is_authentication()
        );
    }
}
