//! Contact lead import service.
//!
//! Uploaded CSV or spreadsheet files are decoded into rows, their columns are
//! matched against the canonical lead fields, and after the caller confirms the
//! mapping the rows are validated, deduplicated and stored.

pub mod auth;
pub mod config;
pub mod error;
pub mod import;
pub mod services;
pub mod state;
pub mod store;
