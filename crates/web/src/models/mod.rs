//! Domain models for the web application.
//!
//! Domain types are separate from database row types; repositories convert
//! rows into these and reject rows that violate their invariants.

pub mod order;
pub mod session;
pub mod staff;

pub use order::{NewOrder, Order, OrderPatch, PlaceOrderRequest, ValidationError};
pub use session::{SessionIdentity, keys as session_keys};
pub use staff::StaffAccount;
