//! Test harness for operator scenarios
//!
//! Free helpers work on any token and chain; [`TestContext`] bundles them with
//! the per-scenario token, the account list and the suite settings.

use std::sync::Arc;

use erc777_primitives::{format_units, parse_units, Address, Gas, U256};
use erc777_sdk::types::BlockSummary;
use erc777_token::{Chain, OperatorToken, SendOptions, TokenResult};

use crate::fixture::TokenFixture;
use crate::scenarios::Labels;
use crate::{ConformanceError, ConformanceResult};

/// Scenarios address `accounts[0..=3]`
pub const REQUIRED_ACCOUNTS: usize = 4;

/// Knobs shared by every scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteSettings {
    /// Gas limit of scenario transactions
    pub gas: Gas,
    /// Gas limit of the setup mints
    pub mint_gas: Gas,
    /// Balance minted to every account before each scenario
    pub initial_amount: String,
    /// Token decimals used to convert human amounts
    pub decimals: u32,
}

impl Default for SuiteSettings {
    fn default() -> Self {
        Self {
            gas: 300_000,
            mint_gas: 100_000,
            initial_amount: "10".to_string(),
            decimals: 18,
        }
    }
}

/// First 8 characters of the 0x-prefixed hex address
pub fn format_account(account: &Address) -> String {
    account.short()
}

/// Mint `amount` to every account from `owner`
pub async fn mint_for_all_accounts(
    token: &dyn OperatorToken,
    accounts: &[Address],
    owner: Address,
    amount: U256,
    gas: Gas,
) -> ConformanceResult<()> {
    for holder in accounts {
        token
            .mint(*holder, amount, SendOptions::new(owner, gas))
            .await?;
    }
    tracing::debug!(accounts = accounts.len(), %amount, "minted for all accounts");
    Ok(())
}

/// Fail unless the total supply equals `expected`
pub async fn assert_total_supply(
    token: &dyn OperatorToken,
    expected: U256,
    decimals: u32,
) -> ConformanceResult<()> {
    let actual = token.total_supply().await?;
    if actual != expected {
        return Err(ConformanceError::Assertion(format!(
            "total supply is {}, expected {}",
            format_units(actual, decimals),
            format_units(expected, decimals)
        )));
    }
    Ok(())
}

/// Fail unless `holder` owns exactly `expected`
pub async fn assert_balance(
    token: &dyn OperatorToken,
    holder: Address,
    expected: U256,
    decimals: u32,
) -> ConformanceResult<()> {
    let actual = token.balance_of(holder).await?;
    if actual != expected {
        return Err(ConformanceError::Assertion(format!(
            "balance of {} is {}, expected {}",
            format_account(&holder),
            format_units(actual, decimals),
            format_units(expected, decimals)
        )));
    }
    Ok(())
}

/// Fail unless `isOperatorFor(operator, holder) == expected`
pub async fn assert_operator(
    token: &dyn OperatorToken,
    operator: Address,
    holder: Address,
    expected: bool,
) -> ConformanceResult<()> {
    let actual = token.is_operator_for(operator, holder).await?;
    if actual != expected {
        return Err(ConformanceError::Assertion(format!(
            "isOperatorFor({}, {}) returned {}, expected {}",
            format_account(&operator),
            format_account(&holder),
            actual,
            expected
        )));
    }
    Ok(())
}

/// Latest block, read after each transaction
pub async fn get_block(chain: &dyn Chain) -> ConformanceResult<BlockSummary> {
    let block = chain.get_block().await?;
    tracing::trace!(block = block.number, "latest block");
    Ok(block)
}

/// Accept only a rejected transaction; `what` describes the call
pub fn expect_revert<T>(what: &str, result: TokenResult<T>) -> ConformanceResult<()> {
    match result {
        Ok(_) => Err(ConformanceError::ExpectedRevert(format!(
            "{} was accepted",
            what
        ))),
        Err(e) if e.is_revert() => {
            tracing::debug!(call = what, error = %e, "rejected as expected");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Supply and selected balances at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    total_supply: U256,
    balances: Vec<(Address, U256)>,
}

/// One scenario's token, accounts and settings
pub struct TestContext {
    token: Box<dyn OperatorToken>,
    chain: Arc<dyn Chain>,
    accounts: Vec<Address>,
    symbol: String,
    settings: SuiteSettings,
    initial: U256,
}

impl TestContext {
    /// Deploy a fresh token and mint the initial amount to every account
    pub async fn setup(
        fixture: &dyn TokenFixture,
        settings: &SuiteSettings,
    ) -> ConformanceResult<Self> {
        let chain = fixture.chain();
        let accounts = chain.accounts().await?;
        if accounts.len() < REQUIRED_ACCOUNTS {
            return Err(ConformanceError::NotEnoughAccounts {
                required: REQUIRED_ACCOUNTS,
                available: accounts.len(),
            });
        }
        let initial = parse_units(&settings.initial_amount, settings.decimals)?;

        let token = fixture.deploy().await?;
        let symbol = token.symbol().await?;
        mint_for_all_accounts(
            token.as_ref(),
            &accounts,
            accounts[0],
            initial,
            settings.mint_gas,
        )
        .await?;

        Ok(Self {
            token,
            chain,
            accounts,
            symbol,
            settings: settings.clone(),
            initial,
        })
    }

    /// Token under test
    pub fn token(&self) -> &dyn OperatorToken {
        self.token.as_ref()
    }

    /// All accounts, in chain order
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// `accounts[index]`; setup guarantees [`REQUIRED_ACCOUNTS`] entries
    pub fn account(&self, index: usize) -> Address {
        self.accounts[index]
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Title labels for this context
    pub fn labels(&self) -> Labels {
        Labels::new(&self.accounts, &self.symbol)
    }

    /// Human amount in base units
    pub fn amount(&self, value: &str) -> ConformanceResult<U256> {
        Ok(parse_units(value, self.settings.decimals)?)
    }

    /// Balance every account starts the scenario with
    pub fn initial_balance(&self) -> U256 {
        self.initial
    }

    /// `initial_balance * accounts`
    pub fn initial_supply(&self) -> U256 {
        self.initial
            .saturating_mul(U256::from(self.accounts.len()))
    }

    /// `initial_balance - value`
    pub fn debited(&self, value: &str) -> ConformanceResult<U256> {
        let amount = self.amount(value)?;
        self.initial.checked_sub(amount).ok_or_else(|| {
            ConformanceError::Setup(format!(
                "initial amount {} is below {}",
                self.settings.initial_amount, value
            ))
        })
    }

    /// `initial_balance + value`
    pub fn credited(&self, value: &str) -> ConformanceResult<U256> {
        let amount = self.amount(value)?;
        self.initial
            .checked_add(amount)
            .ok_or_else(|| ConformanceError::Setup(format!("{} overflows", value)))
    }

    /// Send options for `from` with the scenario gas limit
    pub fn opts(&self, from: Address) -> SendOptions {
        SendOptions::new(from, self.settings.gas)
    }

    /// Wait for the chain and return the latest block
    pub async fn get_block(&self) -> ConformanceResult<BlockSummary> {
        get_block(self.chain.as_ref()).await
    }

    /// Total supply equals [`TestContext::initial_supply`]
    pub async fn assert_initial_supply(&self) -> ConformanceResult<()> {
        assert_total_supply(self.token(), self.initial_supply(), self.settings.decimals).await
    }

    /// `holder` owns exactly `expected`
    pub async fn assert_balance(&self, holder: Address, expected: U256) -> ConformanceResult<()> {
        assert_balance(self.token(), holder, expected, self.settings.decimals).await
    }

    /// Each of `holders` still owns the initial balance
    pub async fn assert_initial_balances(&self, holders: &[Address]) -> ConformanceResult<()> {
        for holder in holders {
            self.assert_balance(*holder, self.initial).await?;
        }
        Ok(())
    }

    /// `isOperatorFor(operator, holder) == expected`
    pub async fn assert_operator(
        &self,
        operator: Address,
        holder: Address,
        expected: bool,
    ) -> ConformanceResult<()> {
        assert_operator(self.token(), operator, holder, expected).await
    }

    /// Record supply and the balances of `holders`
    pub async fn snapshot(&self, holders: &[Address]) -> ConformanceResult<Snapshot> {
        let mut balances = Vec::with_capacity(holders.len());
        for holder in holders {
            balances.push((*holder, self.token.balance_of(*holder).await?));
        }
        Ok(Snapshot {
            total_supply: self.token.total_supply().await?,
            balances,
        })
    }

    /// Fail if supply or any balance in `before` moved
    pub async fn assert_unchanged(&self, before: &Snapshot) -> ConformanceResult<()> {
        assert_total_supply(self.token(), before.total_supply, self.settings.decimals).await?;
        for (holder, balance) in &before.balances {
            self.assert_balance(*holder, *balance).await?;
        }
        Ok(())
    }
}
