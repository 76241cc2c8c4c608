//! Staff account management commands.
//!
//! # Environment Variables
//!
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Admin account created by `staff seed`
//! - `MANAGER_USERNAME` / `MANAGER_PASSWORD` - Manager account created by `staff seed`

use secrecy::{ExposeSecret, SecretString};

use clearspring_core::StaffRole;
use clearspring_web::db::StaffRepository;
use clearspring_web::services::AuthService;

use super::{CommandError, open};

/// Create every staff account configured in the environment.
///
/// Accounts that already exist are left untouched.
///
/// # Errors
///
/// Returns `CommandError` if the database is unavailable or an insert fails.
pub async fn seed() -> Result<(), CommandError> {
    let (config, pool) = open().await?;

    if config.staff.is_empty() {
        tracing::warn!("No staff credentials configured; nothing to seed");
        return Ok(());
    }

    let report = AuthService::new(&pool)
        .seed_staff_accounts(&config.staff)
        .await?;

    for username in &report.created {
        tracing::info!(staff = %username, "Created staff account");
    }
    for username in &report.existing {
        tracing::info!(staff = %username, "Staff account already exists, left unchanged");
    }

    Ok(())
}

/// Create a new staff account.
///
/// # Errors
///
/// Returns `CommandError::InvalidRole` for an unknown role, or
/// `CommandError::Auth` if the username is taken or the input is blank.
pub async fn create(
    username: &str,
    password: &SecretString,
    role: &str,
) -> Result<(), CommandError> {
    let role: StaffRole = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let (_config, pool) = open().await?;

    let account = AuthService::new(&pool)
        .create_account(username, password.expose_secret(), role)
        .await?;

    tracing::info!(
        "Staff account created successfully! ID: {}, Username: {}, Role: {}",
        account.id,
        account.username,
        account.role
    );
    Ok(())
}

/// List all staff accounts.
///
/// # Errors
///
/// Returns `CommandError` if the database query fails.
pub async fn list() -> Result<(), CommandError> {
    let (_config, pool) = open().await?;

    let accounts = StaffRepository::new(&pool).list().await?;

    if accounts.is_empty() {
        tracing::info!("No staff accounts");
    }
    for account in accounts {
        tracing::info!("#{} {} ({})", account.id, account.username, account.role);
    }

    Ok(())
}
