//! Vehicle diagnostics API.
//!
//! This library implements a small HTTP service over a single SQLite table
//! of vehicle records, each optionally carrying a diagnostic trouble code.
//!
//! # Routes
//!
//! ```text
//! GET    /               welcome text
//! POST   /add_vehicle    create        201 {message, id}
//! GET    /vehicles       list          200 [vehicle]
//! GET    /vehicles/{id}  fetch         200 vehicle | 404
//! PUT    /vehicles/{id}  partial edit  200 {message} | 404
//! DELETE /vehicles/{id}  hard delete   200 {message} | 404
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`vehicle`]: Vehicle record, create/update inputs, request validation
//! - [`storage`]: Record-access layer (SQLite and in-memory stores)
//! - [`api`]: HTTP handlers, routes, and OpenAPI document
//! - [`dump`]: Console listing for the `dump` command
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod dump;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod utils;
pub mod vehicle;

pub use config::Config;
pub use error::{AppError, Result};
