//! Staff account domain type.

use clearspring_core::{StaffAccountId, StaffRole};

/// A staff login (domain type).
///
/// Accounts are created by the startup bootstrap or the CLI, never through
/// the web UI.
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct StaffAccount {
    /// Unique staff account ID.
    pub id: StaffAccountId,
    /// Unique, non-empty login name.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Permission level.
    pub role: StaffRole,
}

impl StaffAccount {
    /// Returns `true` if this account may edit and delete orders.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}

impl std::fmt::Debug for StaffAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}
