//! Error types for the RAW conversion and caption tools
//!
//! This module defines the error types used throughout the library.
//! The binaries wrap these in `anyhow` at the top level.

use crate::core::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the RAW conversion and caption tools
#[derive(Error, Debug)]
pub enum ToolError {
    /// The RAW decoder rejected the file
    #[error("Failed to decode RAW file '{}': {message}", path.display())]
    RawDecode { path: PathBuf, message: String },

    /// The RAW file decoded but its layout is not something we can develop
    #[error("Unsupported RAW layout in '{}': {reason}", path.display())]
    UnsupportedRaw { path: PathBuf, reason: String },

    /// Writing the JPEG failed
    #[error("Failed to write JPEG '{}': {message}", path.display())]
    JpegEncode { path: PathBuf, message: String },

    /// An external program could not be started
    #[error("Failed to launch '{program}': {message}")]
    Launch { program: String, message: String },

    /// An external program exited unsuccessfully (only raised in strict mode)
    #[error("'{program}' exited with status {code}: {stderr}")]
    ToolFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    /// A session operation was called in the wrong state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Reading user input failed (closed stdin, terminal error)
    #[error("Failed to read input: {0}")]
    Prompt(String),

    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// General I/O error
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ToolError>;

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::IoError(err.to_string())
    }
}
