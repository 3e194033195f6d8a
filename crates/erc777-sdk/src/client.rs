//! RpcClient - JSON-RPC client for an Ethereum-compatible node

use std::time::Duration;

use bytes::Bytes;
use erc777_primitives::{Address, H256};
use serde_json::Value;

use crate::transport::{deserialize_response, MockTransport, Transport};
use crate::types::{
    parse_hex_u64, BlockId, BlockSummary, CallRequest, PendingTransaction, TransactionReceipt,
};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Default interval between receipt polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Client for the handful of `eth_*` methods the conformance harness needs
pub struct RpcClient {
    transport: Box<dyn Transport>,
    poll_interval: Duration,
}

impl RpcClient {
    /// Create a new client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Self {
        Self::with_transport(HttpTransport::new(url))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the polling interval used while waiting for receipts
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Polling interval used while waiting for receipts
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Helper method to make RPC request and deserialize
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        tracing::trace!(method, "rpc call");
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    // ==================== Chain Info ====================

    /// Get the chain ID
    pub async fn chain_id(&self) -> Result<u64, SdkError> {
        let result: String = self.request("eth_chainId", vec![]).await?;
        parse_hex_u64(&result)
    }

    /// Accounts managed (unlocked) by the node, in node order
    pub async fn accounts(&self) -> Result<Vec<Address>, SdkError> {
        self.request("eth_accounts", vec![]).await
    }

    // ==================== Block Queries ====================

    /// Get a block header summary
    pub async fn get_block(&self, block: BlockId) -> Result<Option<BlockSummary>, SdkError> {
        self.request(
            "eth_getBlockByNumber",
            vec![serde_json::to_value(block)?, Value::Bool(false)],
        )
        .await
    }

    // ==================== Transactions ====================

    /// Execute a read-only call
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_call",
                vec![serde_json::to_value(request)?, serde_json::to_value(block)?],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    /// Submit a transaction signed by a node-managed account
    pub async fn send_transaction(
        &self,
        request: &CallRequest,
    ) -> Result<PendingTransaction, SdkError> {
        if request.from.is_none() {
            return Err(SdkError::MissingField("from".to_string()));
        }
        let result: String = self
            .request("eth_sendTransaction", vec![serde_json::to_value(request)?])
            .await?;
        let hash = H256::from_hex(&result)?;
        tracing::debug!(tx = %hash, "transaction submitted");
        Ok(PendingTransaction::new(hash))
    }

    /// Get a transaction receipt, `None` while the transaction is pending
    pub async fn get_receipt(&self, hash: &H256) -> Result<Option<TransactionReceipt>, SdkError> {
        self.request(
            "eth_getTransactionReceipt",
            vec![Value::String(hash.to_hex())],
        )
        .await
    }

    /// Poll until the transaction is mined and return its receipt
    pub async fn wait_for_receipt(&self, hash: &H256) -> Result<TransactionReceipt, SdkError> {
        loop {
            if let Some(receipt) = self.get_receipt(hash).await? {
                tracing::debug!(
                    tx = %hash,
                    block = receipt.block_number,
                    success = receipt.is_success(),
                    "transaction mined"
                );
                return Ok(receipt);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn parse_hex_bytes(s: &str) -> Result<Bytes, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Ok(Bytes::new());
    }
    Ok(Bytes::from(hex::decode(s)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_mock_chain_id() {
        let client = RpcClient::new_mock();
        assert_eq!(client.chain_id().await.unwrap(), 1337);
    }

    #[tokio::test]
    async fn test_client_mock_accounts() {
        let client = RpcClient::new_mock();
        let accounts = client.accounts().await.unwrap();
        assert_eq!(accounts.len(), 4);
        assert_eq!(accounts[0], Address::from_bytes([1u8; 20]));
    }

    #[tokio::test]
    async fn test_send_requires_from() {
        let client = RpcClient::new_mock();
        let result = client.send_transaction(&CallRequest::default()).await;
        assert!(matches!(result, Err(SdkError::MissingField(_))));
    }

    #[tokio::test]
    async fn test_wait_for_receipt_polls_until_mined() {
        let transport = MockTransport::new();
        transport.push_response("eth_getTransactionReceipt", Value::Null);
        transport.push_response("eth_getTransactionReceipt", Value::Null);
        let handle = transport.clone();
        let client = RpcClient::with_transport(transport).with_poll_interval(Duration::ZERO);

        let hash = H256::from_bytes([7u8; 32]);
        let receipt = client.wait_for_receipt(&hash).await.unwrap();

        assert!(receipt.is_success());
        assert_eq!(handle.requests_for("eth_getTransactionReceipt").len(), 3);
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("0x1234").unwrap().as_ref(), &[0x12, 0x34]);
        assert!(parse_hex_bytes("0x").unwrap().is_empty());
        assert!(parse_hex_bytes("0xabc").is_err());
    }
}
