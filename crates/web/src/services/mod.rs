//! Business logic services.
//!
//! - [`access`] - Pure allow/deny decisions for customer and staff guards
//! - [`auth`] - Staff password authentication and startup bootstrap
//! - [`orders`] - Order lifecycle: place, record payment, edit, delete, list

pub mod access;
pub mod auth;
pub mod orders;

pub use access::{Decision, Visibility};
pub use auth::{AuthError, AuthService, SeedReport};
pub use orders::{OrderError, OrderService};
