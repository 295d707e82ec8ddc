//! Core types for the mongocap capped-collection auditor
//!
//! This crate provides the foundations shared by the rest of the workspace:
//!
//! - **Configuration**: TOML + environment configuration loading
//! - **Error handling**: Unified error types

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, DatabaseConfig};
pub use error::{Error, Result, ResultExt};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
