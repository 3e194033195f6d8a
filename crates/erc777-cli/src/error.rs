//! CLI error types

use erc777_conformance::ConformanceError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token bytecode missing or unreadable
    #[error("Bytecode error: {0}")]
    Bytecode(String),

    /// Node unreachable or misbehaving
    #[error("SDK error: {0}")]
    Sdk(String),

    /// Suite could not be prepared
    #[error("Conformance error: {0}")]
    Conformance(#[from] ConformanceError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),

    /// At least one scenario failed; the report has already been printed
    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed {
        /// Failing scenarios
        failed: usize,
        /// Scenarios run
        total: usize,
    },
}

impl CliError {
    /// Whether the details already reached stdout
    pub fn is_reported(&self) -> bool {
        matches!(self, CliError::SuiteFailed { .. })
    }
}
