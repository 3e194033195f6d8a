//! ABI type definitions

use erc777_primitives::{Address, U256};

/// Solidity ABI token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
}

impl Token {
    /// The parameter type this token encodes as
    pub fn type_of(&self) -> ParamType {
        match self {
            Token::Address(_) => ParamType::Address,
            Token::Uint(_) => ParamType::Uint(256),
            Token::Bool(_) => ParamType::Bool,
            Token::Bytes(_) => ParamType::Bytes,
            Token::String(_) => ParamType::String,
        }
    }

    /// Extract an unsigned integer
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Extract a boolean
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Extract a string
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// UTF-8 string
    String,
}

impl ParamType {
    /// Whether the value lives in the tail section
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ParamType::Bytes | ParamType::String)
    }

    /// Canonical name used in function signatures
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint(bits) => format!("uint{}", bits),
            ParamType::Bool => "bool".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::String => "string".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_of() {
        assert_eq!(Token::Uint(U256::one()).type_of(), ParamType::Uint(256));
        assert_eq!(Token::Bytes(vec![]).type_of(), ParamType::Bytes);
    }

    #[test]
    fn test_dynamic() {
        assert!(ParamType::Bytes.is_dynamic());
        assert!(ParamType::String.is_dynamic());
        assert!(!ParamType::Address.is_dynamic());
        assert!(!ParamType::Uint(256).is_dynamic());
    }

    #[test]
    fn test_extractors() {
        assert_eq!(Token::Bool(true).into_bool(), Some(true));
        assert_eq!(Token::Bool(true).into_uint(), None);
        assert_eq!(
            Token::String("ABC".to_string()).into_string().as_deref(),
            Some("ABC")
        );
    }

    #[test]
    fn test_canonical() {
        assert_eq!(ParamType::Uint(256).canonical(), "uint256");
        assert_eq!(ParamType::Address.canonical(), "address");
    }
}
