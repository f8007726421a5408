//! Core functionality module
//!
//! Configuration management and error handling shared by both tools.
//!
//! # Submodules
//!
//! - `config` - Configuration loading and defaults
//! - `error` - Error types and result aliases

pub mod config;
pub mod error;
