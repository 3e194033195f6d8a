//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Transaction hash returned by the mock for `eth_sendTransaction`
pub const MOCK_TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

/// One recorded request made against a [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// RPC method name
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Ok(Value),
    Err { code: i64, message: String },
}

/// Mock transport for testing.
///
/// Resolution order per method: queued replies (consumed FIFO), then the
/// sticky response set with [`MockTransport::set_response`], then built-in
/// defaults. Clones share state, so a test can keep a handle after moving one
/// into a client.
#[derive(Clone)]
pub struct MockTransport {
    queued: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    responses: Arc<Mutex<HashMap<String, Value>>>,
    default_responses: Arc<HashMap<String, Value>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();

        defaults.insert("eth_chainId".to_string(), Value::String("0x539".to_string())); // 1337
        defaults.insert("eth_blockNumber".to_string(), Value::String("0x100".to_string())); // Block 256
        defaults.insert(
            "eth_accounts".to_string(),
            Value::Array(
                (1u8..=4)
                    .map(|i| Value::String(format!("0x{}", hex::encode([i; 20]))))
                    .collect(),
            ),
        );
        defaults.insert(
            "eth_sendTransaction".to_string(),
            Value::String(MOCK_TX_HASH.to_string()),
        );
        defaults.insert(
            "eth_getTransactionReceipt".to_string(),
            serde_json::json!({
                "transactionHash": MOCK_TX_HASH,
                "blockNumber": "0x101",
                "gasUsed": "0x5208",
                "status": "0x1",
                "contractAddress": null,
            }),
        );
        defaults.insert(
            "eth_getBlockByNumber".to_string(),
            serde_json::json!({
                "number": "0x100",
                "hash": "0x0000000000000000000000000000000000000000000000000000000000000100",
                "timestamp": "0x6553f100",
            }),
        );
        defaults.insert("eth_call".to_string(), Value::String("0x".to_string()));

        Self {
            queued: Arc::new(Mutex::new(HashMap::new())),
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(defaults),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a sticky mock response for a specific method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned (only possible if another thread panicked while holding the lock).
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), response);
    }

    /// Queue a one-shot response for a method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_response(&self, method: &str, response: Value) {
        self.push(method, MockReply::Ok(response));
    }

    /// Queue a one-shot RPC error for a method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn push_error(&self, method: &str, code: i64, message: &str) {
        self.push(
            method,
            MockReply::Err {
                code,
                message: message.to_string(),
            },
        );
    }

    fn push(&self, method: &str, reply: MockReply) {
        self.queued
            .lock()
            .expect("MockTransport mutex poisoned")
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    /// All requests seen so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Requests seen so far for one method
    pub fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    /// Clear custom and queued responses
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn clear_responses(&self) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
        self.queued
            .lock()
            .expect("MockTransport mutex poisoned")
            .clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> SdkError {
    SdkError::Transport("MockTransport mutex poisoned".to_string())
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.requests
            .lock()
            .map_err(poisoned)?
            .push(RecordedRequest {
                method: method.to_string(),
                params,
            });

        let queued = self
            .queued
            .lock()
            .map_err(poisoned)?
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        if let Some(reply) = queued {
            return match reply {
                MockReply::Ok(value) => Ok(value),
                MockReply::Err { code, message } => Err(SdkError::Rpc { code, message }),
            };
        }

        let custom_response = self
            .responses
            .lock()
            .map_err(poisoned)?
            .get(method)
            .cloned();
        if let Some(response) = custom_response {
            return Ok(response);
        }

        if let Some(response) = self.default_responses.get(method) {
            return Ok(response.clone());
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let id = self.next_id();
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::trace!(id, method, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            tracing::debug!(id, method, code = error.code, message = %error.message, "rpc error");
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // `null` is a legitimate result (e.g. a receipt that is not mined yet)
        Ok(response.result.unwrap_or(Value::Null))
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
