//! User and session identity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Email, TenantId, UserId};

/// An account holder. Each user is its own tenant: the user ID is the
/// boundary every query is scoped by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Sign-in email, unique.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Session-stored identity.
///
/// Minimal data kept in the session to identify the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub name: String,
}

impl CurrentUser {
    /// The tenant every query for this user must be scoped by.
    #[must_use]
    pub fn tenant(&self) -> TenantId {
        TenantId::from(self.id)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}
