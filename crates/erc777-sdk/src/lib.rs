//! # erc777-sdk
//!
//! Client-side plumbing for driving an ERC-777 token deployed on an
//! Ethereum-compatible node.
//!
//! ## Features
//!
//! - **RpcClient**: JSON-RPC client for node-managed accounts (`eth_accounts`,
//!   `eth_sendTransaction`, `eth_call`, receipts and blocks)
//! - **Contract**: Helpers for encoding/decoding contract calls
//! - **ABI**: Solidity ABI encoding and decoding
//! - **MockTransport**: Scriptable transport for tests
//!
//! ## Contract Interaction
//!
//! ```rust,no_run
//! use erc777_sdk::{RpcClient, contract, abi::Token};
//! use erc777_sdk::types::{BlockId, CallRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RpcClient::new_mock();
//!     let accounts = client.accounts().await?;
//!
//!     let token = erc777_sdk::Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?;
//!     let contract = contract::erc777(token, contract::DEFAULT_MINT_SIGNATURE)?;
//!
//!     let data = contract.encode_call(
//!         "isOperatorFor",
//!         &[Token::Address(accounts[1]), Token::Address(accounts[0])],
//!     )?;
//!     let result = client.call(&CallRequest {
//!         to: Some(token),
//!         data: Some(data),
//!         ..Default::default()
//!     }, BlockId::Latest).await?;
//!
//!     let tokens = contract.decode_output("isOperatorFor", &result)?;
//!     println!("operator: {:?}", tokens[0]);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
pub mod contract;
mod error;
mod transport;
pub mod types;

// Re-export main types
pub use client::{RpcClient, DEFAULT_POLL_INTERVAL};
pub use error::SdkError;
pub use transport::{MockTransport, RecordedRequest, MOCK_TX_HASH};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use erc777_primitives::{Address, BlockNumber, Gas, H256, U256};
