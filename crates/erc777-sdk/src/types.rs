//! SDK types

use bytes::Bytes;
use erc777_primitives::{Address, H256};
use serde::{Deserialize, Deserializer, Serialize};

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&format!("0x{:x}", n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
        }
    }
}

/// Call request for `eth_call` and `eth_sendTransaction`.
///
/// Transactions are sent from node-managed accounts, so `from` selects the
/// signer and no signature travels with the request.
#[derive(Debug, Clone, Default)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address (`None` deploys a contract)
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Input data
    pub data: Option<Bytes>,
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let count = [
            self.from.is_some(),
            self.to.is_some(),
            self.gas.is_some(),
            self.data.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let mut map = serializer.serialize_map(Some(count))?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format!("0x{:x}", gas))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }
        map.end()
    }
}

/// Transaction receipt as returned by `eth_getTransactionReceipt`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Block the transaction was mined in
    #[serde(deserialize_with = "de_hex_u64")]
    pub block_number: u64,
    /// Gas consumed
    #[serde(deserialize_with = "de_hex_u64")]
    pub gas_used: u64,
    /// `1` for success, `0` for a reverted execution
    #[serde(default, deserialize_with = "de_opt_hex_u64")]
    pub status: Option<u64>,
    /// Address of a newly created contract
    #[serde(default)]
    pub contract_address: Option<Address>,
    /// Logs emitted during execution
    #[serde(default)]
    pub logs: Vec<Log>,
}

/// Event log entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Log {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics; `topics[0]` is the event signature hash
    #[serde(default)]
    pub topics: Vec<H256>,
    /// Non-indexed data
    #[serde(default, deserialize_with = "de_hex_bytes")]
    pub data: Bytes,
}

impl TransactionReceipt {
    /// Whether execution succeeded. Pre-Byzantium receipts carry no status
    /// and are treated as successful.
    pub fn is_success(&self) -> bool {
        self.status.map_or(true, |status| status == 1)
    }
}

/// The subset of a block header the harness needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockSummary {
    /// Block number
    #[serde(deserialize_with = "de_hex_u64")]
    pub number: u64,
    /// Block hash
    pub hash: H256,
    /// Unix timestamp
    #[serde(default, deserialize_with = "de_opt_hex_u64")]
    pub timestamp: Option<u64>,
}

/// Pending transaction handle
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    /// Transaction hash
    pub hash: H256,
}

impl PendingTransaction {
    /// Create a new pending transaction
    pub fn new(hash: H256) -> Self {
        Self { hash }
    }

    /// Get the transaction hash
    pub fn hash(&self) -> &H256 {
        &self.hash
    }
}

/// Parse a `0x`-prefixed quantity
pub fn parse_hex_u64(s: &str) -> Result<u64, crate::SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| crate::SdkError::InvalidHex(e.to_string()))
}

fn de_hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
    let s = String::deserialize(deserializer)?;
    let s = s.strip_prefix("0x").unwrap_or(&s);
    hex::decode(s)
        .map(Bytes::from)
        .map_err(serde::de::Error::custom)
}

fn de_hex_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_hex_u64(&s).map_err(serde::de::Error::custom)
}

fn de_opt_hex_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_hex_u64(&s).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_serialize() {
        assert_eq!(
            serde_json::to_string(&BlockId::Latest).unwrap(),
            "\"latest\""
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Number(100)).unwrap(),
            "\"0x64\""
        );
        assert_eq!(
            serde_json::to_string(&BlockId::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_call_request_serialize() {
        let req = CallRequest {
            from: Some(Address::from_low_u64(1)),
            to: Some(Address::ZERO),
            gas: Some(300_000),
            data: Some(Bytes::from(vec![0x01, 0x02])),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gas"], "0x493e0");
        assert_eq!(json["data"], "0x0102");
        assert_eq!(json["from"], Address::from_low_u64(1).to_hex());
    }

    #[test]
    fn test_call_request_skips_none() {
        let req = CallRequest {
            to: Some(Address::ZERO),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("to").is_some());
        assert!(json.get("from").is_none());
        assert!(json.get("gas").is_none());
    }

    #[test]
    fn test_receipt_deserialize() {
        let json = serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "blockNumber": "0x1b",
            "gasUsed": "0xb411",
            "status": "0x0",
            "contractAddress": null,
            "logs": [],
        });
        let receipt: TransactionReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(receipt.block_number, 27);
        assert_eq!(receipt.gas_used, 46_097);
        assert!(!receipt.is_success());
        assert!(receipt.contract_address.is_none());
        assert!(receipt.logs.is_empty());
    }

    #[test]
    fn test_receipt_logs_deserialize() {
        let json = serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "blockNumber": "0x2",
            "gasUsed": "0x5208",
            "status": "0x1",
            "logs": [{
                "address": "0x0101010101010101010101010101010101010101",
                "topics": ["0x0000000000000000000000000000000000000000000000000000000000000001"],
                "data": "0x00ff",
            }],
        });
        let receipt: TransactionReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(receipt.logs[0].topics.len(), 1);
        assert_eq!(receipt.logs[0].data.as_ref(), &[0x00, 0xff]);
    }

    #[test]
    fn test_receipt_without_status_is_success() {
        let json = serde_json::json!({
            "transactionHash": "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b",
            "blockNumber": "0x1",
            "gasUsed": "0x5208",
        });
        let receipt: TransactionReceipt = serde_json::from_value(json).unwrap();
        assert!(receipt.is_success());
    }

    #[test]
    fn test_block_summary_deserialize() {
        let json = serde_json::json!({
            "number": "0x2a",
            "hash": "0x0000000000000000000000000000000000000000000000000000000000000100",
            "transactions": [],
        });
        let block: BlockSummary = serde_json::from_value(json).unwrap();
        assert_eq!(block.number, 42);
        assert_eq!(block.timestamp, None);
    }

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x1").unwrap(), 1);
        assert_eq!(parse_hex_u64("0x100").unwrap(), 256);
        assert_eq!(parse_hex_u64("100").unwrap(), 256);
        assert!(parse_hex_u64("0xzz").is_err());
    }
}
