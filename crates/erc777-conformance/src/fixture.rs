//! Token fixtures: where each scenario's fresh token comes from

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use erc777_primitives::{Gas, U256};
use erc777_sdk::contract::DEFAULT_MINT_SIGNATURE;
use erc777_sdk::RpcClient;
use erc777_token::{
    Chain, OperatorToken, ReferenceChain, RpcChain, RpcToken, SendOptions, TokenError,
    TokenResult, DEFAULT_SYMBOL,
};

use crate::{ConformanceError, ConformanceResult};

/// Gas limit of the creation transaction
pub const DEFAULT_DEPLOY_GAS: Gas = 6_000_000;

/// Supplies a fresh token per scenario, plus the chain it lives on
#[async_trait]
pub trait TokenFixture: Send + Sync {
    /// Human-readable target description used in reports
    fn name(&self) -> String;

    /// The chain tokens are deployed on
    fn chain(&self) -> Arc<dyn Chain>;

    /// Deploy a token with zero supply owned by `accounts[0]`
    async fn deploy(&self) -> TokenResult<Box<dyn OperatorToken>>;
}

/// Fresh in-memory token per scenario
pub struct ReferenceFixture {
    chain: ReferenceChain,
    symbol: String,
    granularity: U256,
}

impl ReferenceFixture {
    /// Fixture over a new default reference chain
    pub fn new() -> Self {
        Self::with_chain(ReferenceChain::new())
    }

    /// Fixture over an existing chain
    pub fn with_chain(chain: ReferenceChain) -> Self {
        Self {
            chain,
            symbol: DEFAULT_SYMBOL.to_string(),
            granularity: U256::one(),
        }
    }

    /// Override the token symbol
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Override the token granularity
    pub fn granularity(mut self, granularity: U256) -> Self {
        self.granularity = granularity;
        self
    }
}

impl Default for ReferenceFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenFixture for ReferenceFixture {
    fn name(&self) -> String {
        "reference token (in-memory)".to_string()
    }

    fn chain(&self) -> Arc<dyn Chain> {
        Arc::new(self.chain.clone())
    }

    async fn deploy(&self) -> TokenResult<Box<dyn OperatorToken>> {
        Ok(Box::new(self.chain.deploy(&self.symbol, self.granularity)?))
    }
}

/// Deploys the token's creation bytecode on a node for every scenario
pub struct RpcFixture {
    client: Arc<RpcClient>,
    chain: Arc<RpcChain>,
    init_code: Bytes,
    deploy_gas: Gas,
    mint_signature: String,
    endpoint: String,
}

impl RpcFixture {
    /// Fixture deploying `init_code` through `client`
    pub fn new(client: Arc<RpcClient>, init_code: Bytes) -> Self {
        Self {
            chain: Arc::new(RpcChain::new(client.clone())),
            client,
            init_code,
            deploy_gas: DEFAULT_DEPLOY_GAS,
            mint_signature: DEFAULT_MINT_SIGNATURE.to_string(),
            endpoint: "json-rpc node".to_string(),
        }
    }

    /// Fixture from hex-encoded creation bytecode (whitespace and `0x`
    /// prefix tolerated)
    pub fn from_hex(client: Arc<RpcClient>, init_code: &str) -> ConformanceResult<Self> {
        let cleaned: String = init_code.split_whitespace().collect();
        let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
        if cleaned.is_empty() {
            return Err(ConformanceError::Setup("token bytecode is empty".to_string()));
        }
        let bytes = hex::decode(cleaned)
            .map_err(|e| ConformanceError::Setup(format!("invalid token bytecode: {}", e)))?;
        Ok(Self::new(client, Bytes::from(bytes)))
    }

    /// Override the creation gas limit
    pub fn with_deploy_gas(mut self, gas: Gas) -> Self {
        self.deploy_gas = gas;
        self
    }

    /// Override the mint signature, e.g. `mint(address,uint256)`
    pub fn with_mint_signature(mut self, signature: impl Into<String>) -> Self {
        self.mint_signature = signature.into();
        self
    }

    /// Endpoint shown in reports
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TokenFixture for RpcFixture {
    fn name(&self) -> String {
        self.endpoint.clone()
    }

    fn chain(&self) -> Arc<dyn Chain> {
        self.chain.clone()
    }

    async fn deploy(&self) -> TokenResult<Box<dyn OperatorToken>> {
        let owner = self
            .chain
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or_else(|| TokenError::Deployment("node exposes no accounts".to_string()))?;

        let token = RpcToken::deploy(
            self.client.clone(),
            self.init_code.clone(),
            SendOptions::new(owner, self.deploy_gas),
            &self.mint_signature,
        )
        .await?;
        Ok(Box::new(token))
    }
}
