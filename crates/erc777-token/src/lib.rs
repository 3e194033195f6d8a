//! # erc777-token
//!
//! The token side of the operator conformance kit.
//!
//! - [`OperatorToken`] / [`Chain`]: the seams the suite drives
//! - [`ReferenceChain`] / [`ReferenceToken`]: in-memory implementation that
//!   mines one block per transaction
//! - [`RpcChain`] / [`RpcToken`]: a deployed contract reached over JSON-RPC
//!
//! ```rust
//! use erc777_token::{OperatorToken, ReferenceChain, SendOptions};
//! use erc777_primitives::U256;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> erc777_token::TokenResult<()> {
//! let chain = ReferenceChain::new();
//! let token = chain.deploy_default()?;
//! let owner = chain.account(0).unwrap();
//! let holder = chain.account(1).unwrap();
//!
//! token.mint(holder, U256::from(10u64), SendOptions::from(owner)).await?;
//! assert_eq!(token.balance_of(holder).await?, U256::from(10u64));
//! assert!(token.is_operator_for(holder, holder).await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod ledger;
mod reference;
mod rpc;
mod token;
mod types;

pub use error::{TokenError, TokenResult};
pub use ledger::{Ledger, RevertReason};
pub use reference::{
    ReferenceChain, ReferenceToken, BLOCK_TIME, DEFAULT_ACCOUNT_COUNT, DEFAULT_SYMBOL,
    GENESIS_TIMESTAMP,
};
pub use rpc::{RpcChain, RpcToken};
pub use token::{Chain, OperatorToken};
pub use types::{SendOptions, TokenEvent, TxReceipt, DEFAULT_GAS};
