//! Clearspring web application library.
//!
//! A small order-taking site for a water delivery business. Customers identify
//! themselves with a phone number and place orders; staff log in with a
//! password to record payments, and admins may edit or delete orders.
//!
//! The binary in `main.rs` wires configuration, the database and Sentry
//! around [`app::build_router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
