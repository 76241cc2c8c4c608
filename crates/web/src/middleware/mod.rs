//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (`x-request-id`)
//! 4. Security headers
//! 5. Session layer (tower-sessions with SQLite store)
//! 6. Login rate limiting (governor), on `/staff/login` only
//!
//! Access control runs inside handlers through the extractors in [`auth`].

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    CurrentIdentity, GuardRejection, RequireAdmin, RequireCustomer, RequireStaff, SessionError,
    clear_all, clear_customer_session, clear_staff_session, current_customer_phone,
    current_identity, current_staff_account, start_customer_session, start_staff_session,
};
pub use rate_limit::{RateLimiterLayer, login_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer, create_session_store};
