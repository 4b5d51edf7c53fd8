use serde::{Deserialize, Serialize};

/// Request body for `POST /add_user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddUserRequest {
    /// Email address of the admin issuing the registration.
    pub user_email: String,

    /// Email address of the user being registered.
    pub new_user_email: String,

    /// Whether the new user is granted admin privileges.
    pub is_admin: bool,
}

impl AddUserRequest {
    /// Create a new `AddUserRequest`.
    pub fn new(
        user_email: impl Into<String>,
        new_user_email: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            new_user_email: new_user_email.into(),
            is_admin,
        }
    }
}
