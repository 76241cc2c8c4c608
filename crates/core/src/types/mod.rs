//! Core types for Clearspring.
//!
//! This module provides type-safe wrappers for the order-taking domain.

pub mod id;
pub mod phone;
pub mod status;

pub use id::*;
pub use phone::{Phone, PhoneError};
pub use status::*;
