//! ABI decoding

use erc777_primitives::{Address, U256};

use super::types::{ParamType, Token};
use crate::SdkError;

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, SdkError> {
    types
        .iter()
        .enumerate()
        .map(|(index, param_type)| decode_token(param_type, data, index * 32))
        .collect()
}

fn decode_token(param_type: &ParamType, data: &[u8], offset: usize) -> Result<Token, SdkError> {
    let word = read_word(data, offset)?;
    match param_type {
        ParamType::Address => {
            if word[..12].iter().any(|b| *b != 0) {
                return Err(SdkError::AbiDecode(format!(
                    "Dirty address padding at offset {}",
                    offset
                )));
            }
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr)))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(word))),
        ParamType::Bool => match U256::from_big_endian(word) {
            v if v.is_zero() => Ok(Token::Bool(false)),
            v if v == U256::one() => Ok(Token::Bool(true)),
            v => Err(SdkError::AbiDecode(format!("Invalid bool value: {}", v))),
        },
        ParamType::Bytes => Ok(Token::Bytes(decode_dynamic(data, word)?)),
        ParamType::String => {
            let bytes = decode_dynamic(data, word)?;
            let s = String::from_utf8(bytes)
                .map_err(|e| SdkError::AbiDecode(format!("Invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
    }
}

/// Follow a tail offset and read `length || data`
fn decode_dynamic(data: &[u8], offset_word: &[u8]) -> Result<Vec<u8>, SdkError> {
    let start = word_to_usize(offset_word)?;
    let len = word_to_usize(read_word(data, start)?)?;
    let begin = start + 32;
    let end = begin
        .checked_add(len)
        .ok_or_else(|| SdkError::AbiDecode("Length overflow".to_string()))?;
    if end > data.len() {
        return Err(SdkError::AbiDecode(format!(
            "Data too short: need {} bytes, have {}",
            end,
            data.len()
        )));
    }
    Ok(data[begin..end].to_vec())
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], SdkError> {
    data.get(offset..offset + 32).ok_or_else(|| {
        SdkError::AbiDecode(format!(
            "Data too short: need {} bytes, have {}",
            offset + 32,
            data.len()
        ))
    })
}

fn word_to_usize(word: &[u8]) -> Result<usize, SdkError> {
    let value = U256::from_big_endian(word);
    if value > U256::from(u32::MAX) {
        return Err(SdkError::AbiDecode(format!("Offset out of range: {}", value)));
    }
    Ok(value.as_usize())
}
