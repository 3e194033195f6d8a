//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// ABI encoding error
    #[error("ABI encoding error: {0}")]
    AbiEncode(String),

    /// ABI decoding error
    #[error("ABI decoding error: {0}")]
    AbiDecode(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl SdkError {
    /// Whether the node rejected the call because contract execution reverted.
    ///
    /// Only the generic `revert` marker is matched; reason strings are not parsed.
    pub fn is_revert(&self) -> bool {
        match self {
            SdkError::Rpc { message, .. } => message.to_ascii_lowercase().contains("revert"),
            _ => false,
        }
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<erc777_primitives::PrimitiveError> for SdkError {
    fn from(e: erc777_primitives::PrimitiveError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<erc777_primitives::HashError> for SdkError {
    fn from(e: erc777_primitives::HashError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_revert() {
        let err = SdkError::Rpc {
            code: -32000,
            message: "VM Exception while processing transaction: revert".to_string(),
        };
        assert!(err.is_revert());

        let err = SdkError::Rpc {
            code: 3,
            message: "execution reverted: ERC777: not an operator".to_string(),
        };
        assert!(err.is_revert());

        let err = SdkError::Rpc {
            code: -32000,
            message: "nonce too low".to_string(),
        };
        assert!(!err.is_revert());

        assert!(!SdkError::Transport("connection refused".to_string()).is_revert());
    }
}
