//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CLEARSPRING_DATABASE_URL` - SQLite connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://data.db?mode=rwc`)
//! - `CLEARSPRING_HOST` - Bind address (default: 127.0.0.1)
//! - `CLEARSPRING_PORT` - Listen port (default: 5000)
//! - `CLEARSPRING_BASE_URL` - Public URL (default: `http://localhost:<port>`)
//! - `CLEARSPRING_TRUST_PROXY` - `true` when a reverse proxy sets
//!   `X-Forwarded-For`; login rate limiting then keys on that header instead
//!   of the peer address (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! ## Staff bootstrap
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Seed the admin account
//! - `MANAGER_USERNAME` / `MANAGER_PASSWORD` - Seed the manager account
//!
//! A staff account is only seeded when BOTH its username and password are set.
//! There are no default credentials.

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use clearspring_core::StaffRole;

const DEFAULT_DATABASE_URL: &str = "sqlite://data.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// SQLite database connection URL
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Staff accounts to create at startup
    pub staff: StaffBootstrap,
    /// Key login rate limiting on proxy headers instead of the peer address
    pub trust_proxy: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Credentials for one staff account supplied through the environment.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct StaffCredentials {
    pub username: String,
    pub password: SecretString,
    pub role: StaffRole,
}

impl std::fmt::Debug for StaffCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Staff accounts to seed at process initialization.
#[derive(Debug, Clone, Default)]
pub struct StaffBootstrap {
    pub admin: Option<StaffCredentials>,
    pub manager: Option<StaffCredentials>,
}

impl StaffBootstrap {
    /// Read `ADMIN_*` and `MANAGER_*` credential pairs from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            admin: staff_credentials("ADMIN_USERNAME", "ADMIN_PASSWORD", StaffRole::Admin),
            manager: staff_credentials(
                "MANAGER_USERNAME",
                "MANAGER_PASSWORD",
                StaffRole::Manager,
            ),
        }
    }

    /// Iterate over the configured accounts.
    pub fn accounts(&self) -> impl Iterator<Item = &StaffCredentials> {
        self.admin.iter().chain(self.manager.iter())
    }

    /// Returns `true` if no staff account is configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.admin.is_none() && self.manager.is_none()
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CLEARSPRING_DATABASE_URL");
        let host = get_env_or_default("CLEARSPRING_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLEARSPRING_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("CLEARSPRING_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLEARSPRING_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_optional_env("CLEARSPRING_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        validate_base_url(&base_url)?;

        let trust_proxy = parse_bool(&get_env_or_default("CLEARSPRING_TRUST_PROXY", "false"))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "CLEARSPRING_TRUST_PROXY".to_string(),
                    "expected true or false".to_string(),
                )
            })?;

        let staff = StaffBootstrap::from_env();
        if staff.is_empty() {
            tracing::warn!(
                "No staff credentials configured; set ADMIN_USERNAME/ADMIN_PASSWORD to enable staff login"
            );
        }

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            staff,
            trust_proxy,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> SecretString {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map_or_else(
            || SecretString::from(DEFAULT_DATABASE_URL),
            SecretString::from,
        )
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Build staff credentials only if both halves are present.
fn staff_credentials(
    username_key: &str,
    password_key: &str,
    role: StaffRole,
) -> Option<StaffCredentials> {
    pair_credentials(
        get_optional_env(username_key),
        get_optional_env(password_key),
        role,
    )
}

fn pair_credentials(
    username: Option<String>,
    password: Option<String>,
    role: StaffRole,
) -> Option<StaffCredentials> {
    match (username, password) {
        (Some(username), Some(password)) => Some(StaffCredentials {
            username: username.trim().to_owned(),
            password: SecretString::from(password),
            role,
        }),
        _ => None,
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url).map_err(|e| {
        ConfigError::InvalidEnvVar("CLEARSPRING_BASE_URL".to_string(), e.to_string())
    })?;
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "CLEARSPRING_BASE_URL".to_string(),
            "must have a host".to_string(),
        ));
    }
    Ok(())
}
