//! Common utilities shared across the identity crates.
//!
//! This crate provides:
//! - Unified error handling
//! - Argument guards run before any I/O
//! - Database configuration

pub mod config;
pub mod error;
pub mod guard;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
