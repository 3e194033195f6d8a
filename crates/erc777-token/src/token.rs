//! The operator-token and chain seams driven by the conformance suite

use async_trait::async_trait;
use erc777_primitives::{Address, U256};
use erc777_sdk::types::BlockSummary;

use crate::{SendOptions, TokenResult, TxReceipt};

/// Token contract handle.
///
/// Reads observe the latest mined state. State-changing calls resolve once the
/// transaction is mined; a rejected transaction resolves to
/// [`TokenError::Reverted`](crate::TokenError::Reverted) and leaves every
/// balance, the total supply and the operator relation untouched.
#[async_trait]
pub trait OperatorToken: Send + Sync {
    /// Contract address
    fn address(&self) -> Address;

    /// Token symbol (display only)
    async fn symbol(&self) -> TokenResult<String>;

    /// Smallest transferable unit, in base units
    async fn granularity(&self) -> TokenResult<U256>;

    /// Sum of all balances
    async fn total_supply(&self) -> TokenResult<U256>;

    /// Balance of `holder`
    async fn balance_of(&self, holder: Address) -> TokenResult<U256>;

    /// Whether `operator` may send on behalf of `holder`. Always true when
    /// `operator == holder`.
    async fn is_operator_for(&self, operator: Address, holder: Address) -> TokenResult<bool>;

    /// Authorize `operator` for the sender. Reverts when `operator` is the
    /// sender.
    async fn authorize_operator(
        &self,
        operator: Address,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt>;

    /// Revoke `operator` for the sender. Reverts when `operator` is the sender.
    async fn revoke_operator(&self, operator: Address, opts: SendOptions)
        -> TokenResult<TxReceipt>;

    /// Move `amount` from `holder` to `to`. Reverts unless the sender is an
    /// operator for `holder`.
    async fn operator_send(
        &self,
        holder: Address,
        to: Address,
        amount: U256,
        data: &[u8],
        operator_data: &[u8],
        opts: SendOptions,
    ) -> TokenResult<TxReceipt>;

    /// Create `amount` new tokens for `holder`. Owner only.
    async fn mint(&self, holder: Address, amount: U256, opts: SendOptions)
        -> TokenResult<TxReceipt>;
}

/// The chain a token lives on
#[async_trait]
pub trait Chain: Send + Sync {
    /// Ordered account list; `accounts[0]` owns freshly deployed tokens
    async fn accounts(&self) -> TokenResult<Vec<Address>>;

    /// Latest mined block
    async fn get_block(&self) -> TokenResult<BlockSummary>;
}
