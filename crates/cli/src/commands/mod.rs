//! Command implementations.

pub mod migrate;
pub mod orders;
pub mod staff;

use sqlx::SqlitePool;
use thiserror::Error;

use clearspring_core::PhoneError;
use clearspring_web::config::{ConfigError, WebConfig};
use clearspring_web::db::{self, RepositoryError};
use clearspring_web::services::{AuthError, OrderError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository query failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Staff account operation failed.
    #[error("Staff account error: {0}")]
    Auth(#[from] AuthError),

    /// Order lookup failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, manager")]
    InvalidRole(String),

    /// Invalid phone number filter.
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
}

/// Load configuration and open a migrated connection pool.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the database cannot
/// be opened and migrated.
pub async fn open() -> Result<(WebConfig, SqlitePool), CommandError> {
    let config = WebConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    Ok((config, pool))
}
