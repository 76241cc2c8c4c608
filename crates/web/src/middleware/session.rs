//! Session middleware configuration.
//!
//! Sets up SQLite-backed sessions using tower-sessions.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::WebConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "clearspring_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session store backed by the application database.
///
/// The `session` table is created by [`SqliteStore::migrate`], which must run
/// once at startup before the store is used.
#[must_use]
pub fn create_session_store(pool: &SqlitePool) -> SqliteStore {
    SqliteStore::new(pool.clone())
}

/// Create the session layer around any session store.
///
/// The cookie is marked `Secure` only when the public base URL is https.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &WebConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
