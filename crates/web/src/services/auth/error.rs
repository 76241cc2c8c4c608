//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during staff authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username empty after trimming.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// Password empty.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
