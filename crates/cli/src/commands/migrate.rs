//! Database migration command.
//!
//! Migrations live in `crates/web/migrations/` and are embedded in the binary.
//! The web server applies them on startup as well; this command is for
//! preparing a database ahead of a deploy.

use super::{CommandError, open};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Running migrations...");
    let (_config, pool) = open().await?;
    pool.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}
