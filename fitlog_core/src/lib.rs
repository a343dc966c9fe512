#![forbid(unsafe_code)]

//! Core domain model and business logic for the fitlog workout tracker.
//!
//! This crate provides:
//! - Domain types (workout entries, the category-bucketed ledger, the
//!   user profile)
//! - Derived-metrics engine (BMI, BMR, MET-based calorie estimates)
//! - Durable ledger store with atomic replace and writer exclusion
//! - Fixed-page report layout engine with PDF emission
//! - Input validation, configuration, and logging

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pdf;
pub mod report;
pub mod store;
pub mod types;
pub mod validate;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use report::render_report;
pub use store::LedgerStore;
pub use types::*;
pub use validate::UserForm;
