//! ABI encoding

use erc777_primitives::{keccak256, U256};

use super::types::{ParamType, Token};
use crate::SdkError;

/// Encode tokens according to the Solidity ABI head/tail layout
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    // Every supported type occupies one 32-byte head slot
    let head_size = tokens.len() * 32;

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for token in tokens {
        if token.type_of().is_dynamic() {
            head.extend(encode_u256(&U256::from(head_size + tail.len())));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

/// Encode function call (selector + params)
pub fn encode_function_call(selector: [u8; 4], tokens: &[Token]) -> Vec<u8> {
    let mut result = selector.to_vec();
    result.extend(encode(tokens));
    result
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(addr) => {
            let mut buf = [0u8; 32];
            buf[12..32].copy_from_slice(addr.as_bytes());
            buf.to_vec()
        }
        Token::Uint(value) => encode_u256(value),
        Token::Bool(b) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            buf.to_vec()
        }
        Token::Bytes(data) => encode_bytes(data),
        Token::String(s) => encode_bytes(s.as_bytes()),
    }
}

/// Encode a U256 as 32 big-endian bytes
fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}

/// Encode dynamic bytes: length word followed by right-padded data
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(&U256::from(data.len()));

    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Parse a type string (e.g., "uint256", "address")
pub fn parse_type(s: &str) -> Result<ParamType, SdkError> {
    match s.trim() {
        "address" => Ok(ParamType::Address),
        "bool" => Ok(ParamType::Bool),
        "string" => Ok(ParamType::String),
        "bytes" => Ok(ParamType::Bytes),
        "uint" => Ok(ParamType::Uint(256)),
        other => {
            let bits = other
                .strip_prefix("uint")
                .ok_or_else(|| SdkError::AbiEncode(format!("Unsupported type: {}", other)))?;
            let bits: usize = bits
                .parse()
                .map_err(|_| SdkError::AbiEncode(format!("Invalid uint size: {}", bits)))?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(SdkError::AbiEncode(format!("Invalid uint size: {}", bits)));
            }
            Ok(ParamType::Uint(bits))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erc777_primitives::Address;

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[Token::Address(addr)]);

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_uint_and_bool() {
        let encoded = encode(&[Token::Uint(U256::from(100)), Token::Bool(true)]);
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 100);
        assert_eq!(encoded[63], 1);
    }

    #[test]
    fn test_encode_empty_bytes() {
        // web3 sends '0x' for data and operatorData
        let encoded = encode(&[Token::Bytes(vec![])]);
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 32); // offset
        assert_eq!(encoded[63], 0); // length
    }

    #[test]
    fn test_encode_two_dynamic_params() {
        let encoded = encode(&[
            Token::Uint(U256::from(7)),
            Token::Bytes(vec![0xaa]),
            Token::Bytes(vec![0xbb, 0xcc]),
        ]);

        // head: 3 words; tail: (len + 1 word) per bytes
        assert_eq!(encoded.len(), 3 * 32 + 2 * 64);
        assert_eq!(encoded[63], 96); // first offset
        assert_eq!(encoded[95], 160); // second offset
        assert_eq!(encoded[127], 1);
        assert_eq!(encoded[128], 0xaa);
        assert_eq!(encoded[191], 2);
        assert_eq!(&encoded[192..194], &[0xbb, 0xcc]);
    }

    #[test]
    fn test_function_selector() {
        assert_eq!(
            function_selector("transfer(address,uint256)"),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
        assert_eq!(
            function_selector("balanceOf(address)"),
            [0x70, 0xa0, 0x82, 0x31]
        );
        assert_eq!(
            function_selector("authorizeOperator(address)"),
            [0x95, 0x9b, 0x8c, 0x3f]
        );
        assert_eq!(
            function_selector("operatorSend(address,address,uint256,bytes,bytes)"),
            [0x62, 0xad, 0x1b, 0x83]
        );
    }

    #[test]
    fn test_encode_function_call() {
        let operator = Address::from_low_u64(3);
        let selector = function_selector("revokeOperator(address)");
        let encoded = encode_function_call(selector, &[Token::Address(operator)]);

        assert_eq!(encoded.len(), 36);
        assert_eq!(&encoded[..4], &selector);
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(parse_type("address").unwrap(), ParamType::Address);
        assert_eq!(parse_type("uint256").unwrap(), ParamType::Uint(256));
        assert_eq!(parse_type("uint").unwrap(), ParamType::Uint(256));
        assert_eq!(parse_type("uint8").unwrap(), ParamType::Uint(8));
        assert_eq!(parse_type(" bool ").unwrap(), ParamType::Bool);
        assert_eq!(parse_type("bytes").unwrap(), ParamType::Bytes);
        assert_eq!(parse_type("string").unwrap(), ParamType::String);
        assert!(parse_type("uint7").is_err());
        assert!(parse_type("int256").is_err());
    }
}
