//! # Rollcall Common Library
//!
//! Shared code for the rollcall services including:
//! - Database schema, models and key-value accessors
//! - Identity normalization (the matching key for all reconciliation)
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod normalize;
pub mod week;

pub use error::{Error, Result};
pub use normalize::normalize_name;
