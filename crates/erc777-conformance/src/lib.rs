//! # erc777-conformance
//!
//! Conformance suite for the operator extension of ERC-777 tokens.
//!
//! Every scenario gets a freshly deployed token with 10 tokens minted to each
//! account, drives one or two operator calls and checks balances, total
//! supply and operator flags afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use erc777_conformance::{ReferenceFixture, Runner, SuiteSettings};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fixture = ReferenceFixture::new();
//! let report = Runner::new(SuiteSettings::default()).run(&fixture).await;
//! assert!(report.is_success());
//! # }
//! ```

mod fixture;
mod harness;
mod report;
mod runner;
mod scenarios;

pub use fixture::{ReferenceFixture, RpcFixture, TokenFixture, DEFAULT_DEPLOY_GAS};
pub use harness::{
    assert_balance, assert_operator, assert_total_supply, expect_revert, format_account,
    get_block, mint_for_all_accounts, Snapshot, SuiteSettings, TestContext, REQUIRED_ACCOUNTS,
};
pub use report::{ScenarioResult, SuiteReport};
pub use runner::Runner;
pub use scenarios::{Labels, Scenario};

use erc777_primitives::UnitsError;
use erc777_token::TokenError;

/// Result alias for the suite
pub type ConformanceResult<T> = Result<T, ConformanceError>;

/// Conformance errors
#[derive(Debug, thiserror::Error)]
pub enum ConformanceError {
    /// Fixture or chain not usable for the suite
    #[error("setup failed: {0}")]
    Setup(String),

    /// The chain exposes fewer accounts than the scenarios use
    #[error("need at least {required} accounts, chain has {available}")]
    NotEnoughAccounts {
        /// Accounts the suite uses
        required: usize,
        /// Accounts the chain exposes
        available: usize,
    },

    /// A token call failed where it was expected to succeed
    #[error("token call failed: {0}")]
    Token(#[from] TokenError),

    /// An observed value differs from the expected one
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A call that must revert was accepted
    #[error("expected revert: {0}")]
    ExpectedRevert(String),

    /// An amount in the settings could not be converted to base units
    #[error("invalid amount: {0}")]
    Units(#[from] UnitsError),
}
