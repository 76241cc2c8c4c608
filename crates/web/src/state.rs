//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::WebConfig;

/// Application state shared across all handlers.
///
/// Built once at startup and cloned into every request via `Arc`. Handlers
/// reach the credential and order stores through [`AppState::pool`]; the
/// session manager lives in the session layer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: WebConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }
}
