//! In-memory reference chain and token
//!
//! Mirrors what a development node does for the suite: deterministic unlocked
//! accounts, one block per transaction, failed receipts for reverts.

use std::sync::Arc;

use async_trait::async_trait;
use erc777_primitives::{keccak256, Address, BlockNumber, Gas, H256, U256};
use erc777_sdk::types::BlockSummary;
use parking_lot::Mutex;

use crate::ledger::{gas, Ledger, RevertReason};
use crate::{
    Chain, OperatorToken, SendOptions, TokenError, TokenEvent, TokenResult, TxReceipt,
};

/// Accounts exposed by [`ReferenceChain::new`]
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// Symbol of tokens deployed with [`ReferenceChain::deploy_default`]
pub const DEFAULT_SYMBOL: &str = "XRT";

/// Timestamp of block 0
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Seconds between consecutive blocks
pub const BLOCK_TIME: u64 = 12;

fn address_from_hash(hash: H256) -> Address {
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(bytes)
}

fn derive_account(index: usize) -> Address {
    address_from_hash(keccak256(format!("operator-tck/account/{}", index).as_bytes()))
}

#[derive(Debug)]
struct ChainState {
    block_number: BlockNumber,
    timestamp: u64,
    tx_count: u64,
}

/// Deterministic in-memory chain
#[derive(Clone)]
pub struct ReferenceChain {
    accounts: Arc<Vec<Address>>,
    state: Arc<Mutex<ChainState>>,
}

impl ReferenceChain {
    /// Chain with [`DEFAULT_ACCOUNT_COUNT`] accounts
    pub fn new() -> Self {
        Self::with_accounts(DEFAULT_ACCOUNT_COUNT)
    }

    /// Chain with `count` accounts
    pub fn with_accounts(count: usize) -> Self {
        Self {
            accounts: Arc::new((0..count).map(derive_account).collect()),
            state: Arc::new(Mutex::new(ChainState {
                block_number: 0,
                timestamp: GENESIS_TIMESTAMP,
                tx_count: 0,
            })),
        }
    }

    /// Account at `index`
    pub fn account(&self, index: usize) -> Option<Address> {
        self.accounts.get(index).copied()
    }

    /// Latest block number
    pub fn block_number(&self) -> BlockNumber {
        self.state.lock().block_number
    }

    /// Deploy a fresh token owned by `accounts[0]`
    pub fn deploy(&self, symbol: &str, granularity: U256) -> TokenResult<ReferenceToken> {
        let owner = self
            .account(0)
            .ok_or_else(|| TokenError::Deployment("chain has no accounts".to_string()))?;

        let (tx_hash, block_number) = self.mine(owner, None);
        let address = address_from_hash(keccak256(tx_hash.as_bytes()));
        tracing::debug!(
            token = %address,
            symbol,
            block = block_number,
            gas_used = gas::DEPLOY,
            "reference token deployed"
        );

        Ok(ReferenceToken {
            address,
            symbol: symbol.to_string(),
            chain: self.clone(),
            ledger: Arc::new(Mutex::new(Ledger::new(owner, granularity))),
        })
    }

    /// Deploy a token with [`DEFAULT_SYMBOL`] and granularity one
    pub fn deploy_default(&self) -> TokenResult<ReferenceToken> {
        self.deploy(DEFAULT_SYMBOL, U256::one())
    }

    /// Include one transaction in a new block
    fn mine(&self, from: Address, to: Option<Address>) -> (H256, BlockNumber) {
        let mut state = self.state.lock();
        state.block_number += 1;
        state.timestamp += BLOCK_TIME;
        state.tx_count += 1;

        let mut preimage = Vec::with_capacity(48);
        preimage.extend_from_slice(&state.tx_count.to_be_bytes());
        preimage.extend_from_slice(from.as_bytes());
        if let Some(to) = to {
            preimage.extend_from_slice(to.as_bytes());
        }
        (keccak256(&preimage), state.block_number)
    }

    fn latest_block(&self) -> BlockSummary {
        let state = self.state.lock();
        BlockSummary {
            number: state.block_number,
            hash: keccak256(&state.block_number.to_be_bytes()),
            timestamp: Some(state.timestamp),
        }
    }
}

impl Default for ReferenceChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Chain for ReferenceChain {
    async fn accounts(&self) -> TokenResult<Vec<Address>> {
        Ok(self.accounts.as_ref().clone())
    }

    async fn get_block(&self) -> TokenResult<BlockSummary> {
        Ok(self.latest_block())
    }
}

/// Token deployed on a [`ReferenceChain`]
#[derive(Clone)]
pub struct ReferenceToken {
    address: Address,
    symbol: String,
    chain: ReferenceChain,
    ledger: Arc<Mutex<Ledger>>,
}

impl ReferenceToken {
    /// Snapshot of the current ledger
    pub fn ledger(&self) -> Ledger {
        self.ledger.lock().clone()
    }

    /// Chain the token is deployed on
    pub fn chain(&self) -> &ReferenceChain {
        &self.chain
    }

    /// Run one transaction against the ledger and mine it.
    ///
    /// Reverted transactions are mined too, with the ledger untouched.
    fn execute<F>(&self, opts: SendOptions, cost: Gas, apply: F) -> TokenResult<TxReceipt>
    where
        F: FnOnce(&mut Ledger) -> Result<TokenEvent, RevertReason>,
    {
        let outcome = if opts.gas < cost {
            Err(RevertReason::OutOfGas)
        } else {
            let mut ledger = self.ledger.lock();
            apply(&mut *ledger)
        };

        let (tx_hash, block_number) = self.chain.mine(opts.from, Some(self.address));
        match outcome {
            Ok(event) => {
                tracing::debug!(
                    tx = %tx_hash,
                    block = block_number,
                    event = event.signature(),
                    "transaction mined"
                );
                Ok(TxReceipt {
                    tx_hash,
                    block_number,
                    gas_used: cost,
                    events: vec![event],
                })
            }
            Err(reason) => {
                let gas_used = if reason == RevertReason::OutOfGas {
                    opts.gas
                } else {
                    cost
                };
                tracing::debug!(
                    tx = %tx_hash,
                    block = block_number,
                    gas_used,
                    %reason,
                    "transaction reverted"
                );
                Err(TokenError::reverted(reason.message()))
            }
        }
    }
}

#[async_trait]
impl OperatorToken for ReferenceToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn symbol(&self) -> TokenResult<String> {
        Ok(self.symbol.clone())
    }

    async fn granularity(&self) -> TokenResult<U256> {
        Ok(self.ledger.lock().granularity())
    }

    async fn total_supply(&self) -> TokenResult<U256> {
        Ok(self.ledger.lock().total_supply())
    }

    async fn balance_of(&self, holder: Address) -> TokenResult<U256> {
        Ok(self.ledger.lock().balance_of(&holder))
    }

    async fn is_operator_for(&self, operator: Address, holder: Address) -> TokenResult<bool> {
        Ok(self.ledger.lock().is_operator_for(&operator, &holder))
    }

    async fn authorize_operator(
        &self,
        operator: Address,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.execute(opts, gas::AUTHORIZE_OPERATOR, |ledger| {
            ledger.authorize_operator(opts.from, operator)
        })
    }

    async fn revoke_operator(
        &self,
        operator: Address,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.execute(opts, gas::REVOKE_OPERATOR, |ledger| {
            ledger.revoke_operator(opts.from, operator)
        })
    }

    async fn operator_send(
        &self,
        holder: Address,
        to: Address,
        amount: U256,
        data: &[u8],
        operator_data: &[u8],
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.execute(opts, gas::OPERATOR_SEND, |ledger| {
            ledger.operator_send(opts.from, holder, to, amount, data, operator_data)
        })
    }

    async fn mint(
        &self,
        holder: Address,
        amount: U256,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.execute(opts, gas::MINT, |ledger| {
            ledger.mint(opts.from, holder, amount, &[])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ReferenceChain, ReferenceToken, Vec<Address>) {
        let chain = ReferenceChain::new();
        let token = chain.deploy_default().unwrap();
        let accounts = chain.accounts.as_ref().clone();
        (chain, token, accounts)
    }

    #[test]
    fn test_accounts_are_distinct_in_short_form() {
        let chain = ReferenceChain::new();
        let mut shorts: Vec<String> = (0..DEFAULT_ACCOUNT_COUNT)
            .filter_map(|i| chain.account(i))
            .map(|a| a.short())
            .collect();
        shorts.sort();
        shorts.dedup();
        assert_eq!(shorts.len(), DEFAULT_ACCOUNT_COUNT);
    }

    #[test]
    fn test_accounts_are_deterministic() {
        assert_eq!(
            ReferenceChain::new().account(3),
            ReferenceChain::with_accounts(4).account(3)
        );
    }

    #[test]
    fn test_deploy_without_accounts_fails() {
        let chain = ReferenceChain::with_accounts(0);
        assert!(matches!(
            chain.deploy_default(),
            Err(TokenError::Deployment(_))
        ));
    }

    #[test]
    fn test_deploy_mines_a_block() {
        let chain = ReferenceChain::new();
        assert_eq!(chain.block_number(), 0);
        let first = chain.deploy_default().unwrap();
        let second = chain.deploy_default().unwrap();
        assert_eq!(chain.block_number(), 2);
        assert_ne!(first.address(), second.address());
    }

    #[tokio::test]
    async fn test_each_transaction_mines_a_block() {
        let (chain, token, accounts) = setup();
        let before = chain.get_block().await.unwrap();

        let receipt = token
            .mint(accounts[1], U256::from(10u64), SendOptions::from(accounts[0]))
            .await
            .unwrap();

        let after = chain.get_block().await.unwrap();
        assert_eq!(receipt.block_number, before.number + 1);
        assert_eq!(after.number, receipt.block_number);
        assert_eq!(after.timestamp, before.timestamp.map(|t| t + BLOCK_TIME));
        assert_eq!(receipt.gas_used, gas::MINT);
    }

    #[tokio::test]
    async fn test_revert_mines_block_without_state_change() {
        let (chain, token, accounts) = setup();
        let height = chain.block_number();

        let err = token
            .authorize_operator(accounts[3], SendOptions::from(accounts[3]))
            .await
            .unwrap_err();

        assert!(err.is_revert());
        assert_eq!(chain.block_number(), height + 1);
        assert!(token.is_operator_for(accounts[3], accounts[3]).await.unwrap());
    }

    #[tokio::test]
    async fn test_out_of_gas() {
        let (_, token, accounts) = setup();
        token
            .mint(accounts[1], U256::from(100u64), SendOptions::from(accounts[0]))
            .await
            .unwrap();

        let err = token
            .operator_send(
                accounts[1],
                accounts[2],
                U256::from(1u64),
                &[],
                &[],
                SendOptions::new(accounts[1], gas::OPERATOR_SEND - 1),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenError::Reverted { reason: Some(ref r) } if r == "out of gas"
        ));
        assert_eq!(
            token.balance_of(accounts[1]).await.unwrap(),
            U256::from(100u64)
        );
    }

    #[tokio::test]
    async fn test_receipt_events() {
        let (_, token, accounts) = setup();
        let receipt = token
            .authorize_operator(accounts[3], SendOptions::from(accounts[1]))
            .await
            .unwrap();
        assert_eq!(
            receipt.events,
            vec![TokenEvent::AuthorizedOperator {
                operator: accounts[3],
                holder: accounts[1],
            }]
        );
    }

    #[tokio::test]
    async fn test_tokens_do_not_share_state() {
        let (chain, first, accounts) = setup();
        let second = chain.deploy_default().unwrap();

        first
            .authorize_operator(accounts[3], SendOptions::from(accounts[1]))
            .await
            .unwrap();

        assert!(first.is_operator_for(accounts[3], accounts[1]).await.unwrap());
        assert!(!second.is_operator_for(accounts[3], accounts[1]).await.unwrap());
    }
}
