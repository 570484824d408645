//! User domain types.

use chrono::{DateTime, Utc};

use storekeep_core::{Email, Role, UserId};

/// A registered shop account.
///
/// Created at signup (or by the admin bootstrap), never mutated afterwards
/// and never deleted.
#[derive(Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across all users.
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Permission level.
    pub role: Role,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user may manage the catalog.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}
