use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acting user resolved by the boundary for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: Uuid,
    username: String,
    is_superuser: bool,
}

impl UserIdentity {
    /// Creates an acting-user identity.
    #[must_use]
    pub fn new(user_id: Uuid, username: impl Into<String>, is_superuser: bool) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_superuser,
        }
    }

    /// Returns the stable account identifier.
    #[must_use]
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the login name of the acting user.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns whether the acting user is a superuser.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }
}
