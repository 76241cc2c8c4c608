//! Database operations for the Clearspring SQLite store.
//!
//! ## Tables
//!
//! - `staff_account` - Staff logins (admin / manager), seeded from the environment
//! - `customer_order` - Delivery orders placed by customers
//! - `session` - Tower-sessions storage (created by the session store itself)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/`, embedded at compile time,
//! and run on startup or via:
//! ```bash
//! cargo run -p clearspring-cli -- migrate
//! ```

pub mod orders;
pub mod staff;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use orders::OrderRepository;
pub use staff::StaffRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if it does not exist and foreign keys are
/// enforced.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be
/// established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Run the embedded schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails to apply.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Create a migrated in-memory database for tests.
///
/// Limited to a single connection: every `sqlite::memory:` connection is its
/// own database.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations apply");
    pool
}
