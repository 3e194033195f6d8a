//! In-memory ERC-777 operator ledger
//!
//! A pure state machine: every mutating method validates first and only then
//! writes, so a returned [`RevertReason`] means nothing changed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bytes::Bytes;
use erc777_primitives::{Address, U256};

use crate::TokenEvent;

/// Gas charged by the reference token, per call
pub mod gas {
    use erc777_primitives::Gas;

    /// Intrinsic cost of any transaction
    pub const TX_BASE: Gas = 21_000;
    /// Contract creation
    pub const DEPLOY: Gas = 1_200_000;
    /// `mint`
    pub const MINT: Gas = TX_BASE + 52_000;
    /// `authorizeOperator`
    pub const AUTHORIZE_OPERATOR: Gas = TX_BASE + 24_000;
    /// `revokeOperator`
    pub const REVOKE_OPERATOR: Gas = TX_BASE + 8_000;
    /// `operatorSend`
    pub const OPERATOR_SEND: Gas = TX_BASE + 38_000;
}

/// Why the reference token rejected a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertReason {
    /// `mint` from anyone but the owner
    NotOwner,
    /// Mint or send to the zero address
    ZeroRecipient,
    /// `authorizeOperator` naming the caller
    AuthorizeSelf,
    /// `revokeOperator` naming the caller
    RevokeSelf,
    /// `operatorSend` from an account that is not an operator for the holder
    NotOperator,
    /// Holder balance below the amount
    InsufficientBalance,
    /// Amount not a multiple of the granularity
    Granularity,
    /// Total supply would exceed `U256::MAX`
    SupplyOverflow,
    /// Gas limit below the cost of the call
    OutOfGas,
}

impl RevertReason {
    /// Reason string reported in the revert
    pub fn message(&self) -> &'static str {
        match self {
            RevertReason::NotOwner => "ERC777: caller is not the owner",
            RevertReason::ZeroRecipient => "ERC777: cannot send to the zero address",
            RevertReason::AuthorizeSelf => "ERC777: authorizing self as operator",
            RevertReason::RevokeSelf => "ERC777: revoking self as operator",
            RevertReason::NotOperator => "ERC777: caller is not an operator for holder",
            RevertReason::InsufficientBalance => "ERC777: insufficient balance",
            RevertReason::Granularity => "ERC777: amount is not a multiple of granularity",
            RevertReason::SupplyOverflow => "ERC777: total supply overflow",
            RevertReason::OutOfGas => "out of gas",
        }
    }
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Balances, supply and the operator relation of one token
#[derive(Debug, Clone)]
pub struct Ledger {
    owner: Address,
    granularity: U256,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    /// `(holder, operator)` pairs; the self pair is implicit
    operators: HashSet<(Address, Address)>,
}

impl Ledger {
    /// Empty ledger owned by `owner`. A zero granularity is treated as one.
    pub fn new(owner: Address, granularity: U256) -> Self {
        Self {
            owner,
            granularity: granularity.max(U256::one()),
            total_supply: U256::zero(),
            balances: HashMap::new(),
            operators: HashSet::new(),
        }
    }

    /// The only account allowed to mint
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Smallest transferable unit
    pub fn granularity(&self) -> U256 {
        self.granularity
    }

    /// Total supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Balance of `holder`, zero when unknown
    pub fn balance_of(&self, holder: &Address) -> U256 {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    /// Sum over all balances; equals [`Ledger::total_supply`] at all times
    pub fn sum_of_balances(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::zero(), |acc, b| acc.saturating_add(*b))
    }

    /// Operator check
    pub fn is_operator_for(&self, operator: &Address, holder: &Address) -> bool {
        operator == holder || self.operators.contains(&(*holder, *operator))
    }

    fn check_granularity(&self, amount: U256) -> Result<(), RevertReason> {
        if (amount % self.granularity).is_zero() {
            Ok(())
        } else {
            Err(RevertReason::Granularity)
        }
    }

    /// Create `amount` tokens for `to`; `operator_data` is the mint payload
    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
        operator_data: &[u8],
    ) -> Result<TokenEvent, RevertReason> {
        if caller != self.owner {
            return Err(RevertReason::NotOwner);
        }
        if to.is_zero() {
            return Err(RevertReason::ZeroRecipient);
        }
        self.check_granularity(amount)?;
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(RevertReason::SupplyOverflow)?;

        self.total_supply = total_supply;
        // cannot overflow: every balance is bounded by the total supply
        *self.balances.entry(to).or_default() += amount;

        Ok(TokenEvent::Minted {
            operator: caller,
            to,
            amount,
            data: Bytes::new(),
            operator_data: Bytes::copy_from_slice(operator_data),
        })
    }

    /// Authorize `operator` to send on behalf of `caller`
    pub fn authorize_operator(
        &mut self,
        caller: Address,
        operator: Address,
    ) -> Result<TokenEvent, RevertReason> {
        if caller == operator {
            return Err(RevertReason::AuthorizeSelf);
        }
        self.operators.insert((caller, operator));
        Ok(TokenEvent::AuthorizedOperator {
            operator,
            holder: caller,
        })
    }

    /// Revoke `operator` for `caller`. Revoking an operator that was never
    /// authorized succeeds.
    pub fn revoke_operator(
        &mut self,
        caller: Address,
        operator: Address,
    ) -> Result<TokenEvent, RevertReason> {
        if caller == operator {
            return Err(RevertReason::RevokeSelf);
        }
        self.operators.remove(&(caller, operator));
        Ok(TokenEvent::RevokedOperator {
            operator,
            holder: caller,
        })
    }

    /// Move `amount` from `holder` to `to` on behalf of `caller`
    pub fn operator_send(
        &mut self,
        caller: Address,
        holder: Address,
        to: Address,
        amount: U256,
        data: &[u8],
        operator_data: &[u8],
    ) -> Result<TokenEvent, RevertReason> {
        if !self.is_operator_for(&caller, &holder) {
            return Err(RevertReason::NotOperator);
        }
        if to.is_zero() {
            return Err(RevertReason::ZeroRecipient);
        }
        self.check_granularity(amount)?;
        let from_balance = self.balance_of(&holder);
        if from_balance < amount {
            return Err(RevertReason::InsufficientBalance);
        }

        self.balances.insert(holder, from_balance - amount);
        *self.balances.entry(to).or_default() += amount;

        Ok(TokenEvent::Sent {
            operator: caller,
            from: holder,
            to,
            amount,
            data: Bytes::copy_from_slice(data),
            operator_data: Bytes::copy_from_slice(operator_data),
        })
    }
}
