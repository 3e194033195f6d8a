//! Solidity ABI encoding and decoding
//!
//! Covers the parameter types the ERC-777 operator surface uses: `address`,
//! `uint<N>`, `bool`, and the dynamic `bytes` / `string` types.
//!
//! # Example
//!
//! ```rust
//! use erc777_sdk::abi::{decode, encode_function_call, function_selector, ParamType, Token};
//! use erc777_primitives::{Address, U256};
//!
//! let selector = function_selector("authorizeOperator(address)");
//! let data = encode_function_call(selector, &[Token::Address(Address::ZERO)]);
//! assert_eq!(data.len(), 4 + 32);
//!
//! let return_data = [0u8; 32];
//! let balance = decode(&[ParamType::Uint(256)], &return_data).unwrap();
//! assert_eq!(balance, vec![Token::Uint(U256::zero())]);
//! ```

mod decode;
mod encode;
mod types;

pub use decode::decode;
pub use encode::{encode, encode_function_call, function_selector, parse_type};
pub use types::{ParamType, Token};
