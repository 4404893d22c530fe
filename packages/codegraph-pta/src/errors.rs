//! Error types for codegraph-pta
//!
//! Only configuration problems, unreadable input and broken internal invariants
//! are errors. Unresolved calls and skipped statements are normal analysis
//! outcomes and are reported through logging instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for codegraph-pta operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// Invalid configuration (fatal at run start)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Structurally invalid IR input (duplicate signatures, unknown entry points)
    #[error("IR error: {0}")]
    Ir(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Internal invariant violation
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl PtaError {
    /// Create an IR error
    pub fn ir(msg: impl Into<String>) -> Self {
        PtaError::Ir(msg.into())
    }

    /// Create an invariant error
    pub fn invariant(msg: impl Into<String>) -> Self {
        PtaError::Invariant(msg.into())
    }
}

/// Result type alias for pointer analysis operations
pub type Result<T> = std::result::Result<T, PtaError>;
