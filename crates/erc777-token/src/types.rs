//! Transaction options, receipts and token events

use bytes::Bytes;
use erc777_primitives::{keccak256, Address, BlockNumber, Gas, H256, U256};
use erc777_sdk::abi::{decode, ParamType, Token};
use erc777_sdk::types::Log;

use crate::{TokenError, TokenResult};

/// Gas limit used when none is given
pub const DEFAULT_GAS: Gas = 300_000;

/// Sender and gas limit of a state-changing call, the `send({from, gas})`
/// pair of a web3 contract call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Transaction sender
    pub from: Address,
    /// Gas limit
    pub gas: Gas,
}

impl SendOptions {
    /// Options with an explicit gas limit
    pub fn new(from: Address, gas: Gas) -> Self {
        Self { from, gas }
    }

    /// Options with [`DEFAULT_GAS`]
    pub fn from(from: Address) -> Self {
        Self::new(from, DEFAULT_GAS)
    }
}

/// Events emitted by the operator surface of an ERC-777 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    /// Tokens created
    Minted {
        /// Minting operator
        operator: Address,
        /// Recipient
        to: Address,
        /// Amount in base units
        amount: U256,
        /// Holder data
        data: Bytes,
        /// Operator data
        operator_data: Bytes,
    },
    /// Tokens moved
    Sent {
        /// Caller that triggered the move
        operator: Address,
        /// Debited holder
        from: Address,
        /// Credited recipient
        to: Address,
        /// Amount in base units
        amount: U256,
        /// Holder data
        data: Bytes,
        /// Operator data
        operator_data: Bytes,
    },
    /// `operator` may now send on behalf of `holder`
    AuthorizedOperator {
        /// Operator
        operator: Address,
        /// Holder
        holder: Address,
    },
    /// `operator` may no longer send on behalf of `holder`
    RevokedOperator {
        /// Operator
        operator: Address,
        /// Holder
        holder: Address,
    },
}

const MINTED: &str = "Minted(address,address,uint256,bytes,bytes)";
const SENT: &str = "Sent(address,address,address,uint256,bytes,bytes)";
const AUTHORIZED_OPERATOR: &str = "AuthorizedOperator(address,address)";
const REVOKED_OPERATOR: &str = "RevokedOperator(address,address)";

impl TokenEvent {
    /// Canonical event signature
    pub fn signature(&self) -> &'static str {
        match self {
            TokenEvent::Minted { .. } => MINTED,
            TokenEvent::Sent { .. } => SENT,
            TokenEvent::AuthorizedOperator { .. } => AUTHORIZED_OPERATOR,
            TokenEvent::RevokedOperator { .. } => REVOKED_OPERATOR,
        }
    }

    /// `topics[0]` of the corresponding log
    pub fn topic(&self) -> H256 {
        keccak256(self.signature().as_bytes())
    }

    /// Decode a log entry.
    ///
    /// Returns `Ok(None)` for logs whose first topic is not one of the four
    /// operator events.
    pub fn from_log(log: &Log) -> TokenResult<Option<Self>> {
        let Some(topic0) = log.topics.first() else {
            return Ok(None);
        };

        let event = if *topic0 == keccak256(MINTED.as_bytes()) {
            let (amount, data, operator_data) = decode_amount_and_data(&log.data)?;
            TokenEvent::Minted {
                operator: topic_address(log, 1)?,
                to: topic_address(log, 2)?,
                amount,
                data,
                operator_data,
            }
        } else if *topic0 == keccak256(SENT.as_bytes()) {
            let (amount, data, operator_data) = decode_amount_and_data(&log.data)?;
            TokenEvent::Sent {
                operator: topic_address(log, 1)?,
                from: topic_address(log, 2)?,
                to: topic_address(log, 3)?,
                amount,
                data,
                operator_data,
            }
        } else if *topic0 == keccak256(AUTHORIZED_OPERATOR.as_bytes()) {
            TokenEvent::AuthorizedOperator {
                operator: topic_address(log, 1)?,
                holder: topic_address(log, 2)?,
            }
        } else if *topic0 == keccak256(REVOKED_OPERATOR.as_bytes()) {
            TokenEvent::RevokedOperator {
                operator: topic_address(log, 1)?,
                holder: topic_address(log, 2)?,
            }
        } else {
            return Ok(None);
        };

        Ok(Some(event))
    }
}

fn topic_address(log: &Log, index: usize) -> TokenResult<Address> {
    let topic = log.topics.get(index).ok_or_else(|| {
        TokenError::InvalidResponse(format!("log is missing indexed topic {}", index))
    })?;
    Address::from_slice(&topic.as_bytes()[12..])
        .map_err(|e| TokenError::InvalidResponse(e.to_string()))
}

fn decode_amount_and_data(data: &[u8]) -> TokenResult<(U256, Bytes, Bytes)> {
    let mut tokens = decode(&[ParamType::Uint(256), ParamType::Bytes, ParamType::Bytes], data)?
        .into_iter();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(Token::Uint(amount)), Some(Token::Bytes(data)), Some(Token::Bytes(operator_data))) => {
            Ok((amount, Bytes::from(data), Bytes::from(operator_data)))
        }
        _ => Err(TokenError::InvalidResponse(
            "malformed event data".to_string(),
        )),
    }
}

/// Outcome of a mined, successful transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: H256,
    /// Block the transaction was mined in
    pub block_number: BlockNumber,
    /// Gas consumed
    pub gas_used: Gas,
    /// Operator events emitted by the token
    pub events: Vec<TokenEvent>,
}
