//! Clearspring Core - Shared domain types.
//!
//! This crate provides the types shared by the Clearspring components:
//! - `web` - Order-taking web application (customers and staff)
//! - `cli` - Command-line tools for migrations and staff bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. Database encoding for IDs is available behind the `sqlite` feature.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, phone numbers, roles and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
