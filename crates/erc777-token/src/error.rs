//! Token error types

use erc777_sdk::SdkError;
use thiserror::Error;

/// Result alias for token operations
pub type TokenResult<T> = Result<T, TokenError>;

/// Token error type
#[derive(Debug, Error)]
pub enum TokenError {
    /// The transaction was rejected by the token
    #[error("transaction reverted: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Reverted {
        /// Revert reason when the backend reports one
        reason: Option<String>,
    },

    /// Client / transport failure
    #[error("sdk error: {0}")]
    Sdk(#[from] SdkError),

    /// The backend answered with something that does not fit the interface
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Contract deployment failed
    #[error("deployment failed: {0}")]
    Deployment(String),
}

impl TokenError {
    /// Create a revert error carrying a reason
    pub fn reverted(reason: impl Into<String>) -> Self {
        TokenError::Reverted {
            reason: Some(reason.into()),
        }
    }

    /// Whether this error is a rejected transaction rather than an
    /// infrastructure failure
    pub fn is_revert(&self) -> bool {
        match self {
            TokenError::Reverted { .. } => true,
            TokenError::Sdk(e) => e.is_revert(),
            _ => false,
        }
    }
}
