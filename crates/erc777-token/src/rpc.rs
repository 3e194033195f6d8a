//! ERC-777 token reached over JSON-RPC

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use erc777_primitives::{Address, U256};
use erc777_sdk::abi::{ParamType, Token};
use erc777_sdk::contract::{erc777, Contract};
use erc777_sdk::types::{BlockId, BlockSummary, CallRequest, TransactionReceipt};
use erc777_sdk::{RpcClient, SdkError};

use crate::{
    Chain, OperatorToken, SendOptions, TokenError, TokenEvent, TokenResult, TxReceipt,
};

fn map_send_error(e: SdkError) -> TokenError {
    if e.is_revert() {
        match e {
            SdkError::Rpc { message, .. } => TokenError::Reverted {
                reason: Some(message),
            },
            other => TokenError::Sdk(other),
        }
    } else {
        TokenError::Sdk(e)
    }
}

/// Chain backed by a node
#[derive(Clone)]
pub struct RpcChain {
    client: Arc<RpcClient>,
}

impl RpcChain {
    /// Wrap a client
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &Arc<RpcClient> {
        &self.client
    }
}

#[async_trait]
impl Chain for RpcChain {
    async fn accounts(&self) -> TokenResult<Vec<Address>> {
        Ok(self.client.accounts().await?)
    }

    async fn get_block(&self) -> TokenResult<BlockSummary> {
        self.client
            .get_block(BlockId::Latest)
            .await?
            .ok_or_else(|| TokenError::InvalidResponse("node has no latest block".to_string()))
    }
}

/// Token contract driven through `eth_call` / `eth_sendTransaction`
pub struct RpcToken {
    client: Arc<RpcClient>,
    contract: Contract,
}

impl RpcToken {
    /// Bind to an already deployed token
    pub fn at(client: Arc<RpcClient>, address: Address, mint_signature: &str) -> TokenResult<Self> {
        Ok(Self {
            client,
            contract: erc777(address, mint_signature)?,
        })
    }

    /// Deploy `init_code` (creation bytecode with constructor arguments
    /// appended) from `opts.from` and bind to the new contract
    pub async fn deploy(
        client: Arc<RpcClient>,
        init_code: Bytes,
        opts: SendOptions,
        mint_signature: &str,
    ) -> TokenResult<Self> {
        let request = CallRequest {
            from: Some(opts.from),
            to: None,
            gas: Some(opts.gas),
            data: Some(init_code),
        };
        let pending = client.send_transaction(&request).await.map_err(|e| {
            if e.is_revert() {
                TokenError::Deployment(e.to_string())
            } else {
                TokenError::Sdk(e)
            }
        })?;
        let receipt = client.wait_for_receipt(pending.hash()).await?;
        if !receipt.is_success() {
            return Err(TokenError::Deployment(format!(
                "creation transaction {} failed",
                receipt.transaction_hash
            )));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            TokenError::Deployment("receipt carries no contract address".to_string())
        })?;

        tracing::debug!(token = %address, block = receipt.block_number, "token deployed");
        Self::at(client, address, mint_signature)
    }

    /// Contract interface
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    async fn call(&self, function: &str, args: &[Token]) -> TokenResult<Token> {
        let data = self.contract.encode_call(function, args)?;
        let request = CallRequest {
            to: Some(*self.contract.address()),
            data: Some(data),
            ..Default::default()
        };
        let raw = self.client.call(&request, BlockId::Latest).await?;
        self.contract
            .decode_output(function, &raw)?
            .into_iter()
            .next()
            .ok_or_else(|| TokenError::InvalidResponse(format!("{} returned nothing", function)))
    }

    async fn transact(
        &self,
        function: &str,
        args: &[Token],
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        let data = self.contract.encode_call(function, args)?;
        let request = CallRequest {
            from: Some(opts.from),
            to: Some(*self.contract.address()),
            gas: Some(opts.gas),
            data: Some(data),
        };

        let pending = self
            .client
            .send_transaction(&request)
            .await
            .map_err(map_send_error)?;
        let receipt = self.client.wait_for_receipt(pending.hash()).await?;
        if !receipt.is_success() {
            tracing::debug!(
                function,
                tx = %receipt.transaction_hash,
                block = receipt.block_number,
                "transaction reverted"
            );
            return Err(TokenError::Reverted { reason: None });
        }

        self.to_tx_receipt(receipt)
    }

    fn to_tx_receipt(&self, receipt: TransactionReceipt) -> TokenResult<TxReceipt> {
        let mut events = Vec::new();
        for log in receipt
            .logs
            .iter()
            .filter(|log| log.address == *self.contract.address())
        {
            if let Some(event) = TokenEvent::from_log(log)? {
                events.push(event);
            }
        }

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            events,
        })
    }
}

fn expect_uint(token: Token, function: &str) -> TokenResult<U256> {
    token
        .into_uint()
        .ok_or_else(|| TokenError::InvalidResponse(format!("{} did not return a uint", function)))
}

#[async_trait]
impl OperatorToken for RpcToken {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn symbol(&self) -> TokenResult<String> {
        self.call("symbol", &[])
            .await?
            .into_string()
            .ok_or_else(|| TokenError::InvalidResponse("symbol did not return a string".to_string()))
    }

    async fn granularity(&self) -> TokenResult<U256> {
        expect_uint(self.call("granularity", &[]).await?, "granularity")
    }

    async fn total_supply(&self) -> TokenResult<U256> {
        expect_uint(self.call("totalSupply", &[]).await?, "totalSupply")
    }

    async fn balance_of(&self, holder: Address) -> TokenResult<U256> {
        expect_uint(
            self.call("balanceOf", &[Token::Address(holder)]).await?,
            "balanceOf",
        )
    }

    async fn is_operator_for(&self, operator: Address, holder: Address) -> TokenResult<bool> {
        self.call(
            "isOperatorFor",
            &[Token::Address(operator), Token::Address(holder)],
        )
        .await?
        .into_bool()
        .ok_or_else(|| {
            TokenError::InvalidResponse("isOperatorFor did not return a bool".to_string())
        })
    }

    async fn authorize_operator(
        &self,
        operator: Address,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.transact("authorizeOperator", &[Token::Address(operator)], opts)
            .await
    }

    async fn revoke_operator(
        &self,
        operator: Address,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        self.transact("revokeOperator", &[Token::Address(operator)], opts)
            .await
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
        self.transact(
            "operatorSend",
            &[
                Token::Address(holder),
                Token::Address(to),
                Token::Uint(amount),
                Token::Bytes(data.to_vec()),
                Token::Bytes(operator_data.to_vec()),
            ],
            opts,
        )
        .await
    }

    async fn mint(
        &self,
        holder: Address,
        amount: U256,
        opts: SendOptions,
    ) -> TokenResult<TxReceipt> {
        // mint signatures differ between token implementations; fill in
        // whatever trailing parameters the configured one declares
        let inputs = self
            .contract
            .function("mint")
            .map(|f| f.inputs.clone())
            .unwrap_or_default();
        let mut args = vec![Token::Address(holder), Token::Uint(amount)];
        for param in inputs.iter().skip(args.len()) {
            args.push(match param {
                ParamType::Bytes => Token::Bytes(vec![]),
                ParamType::String => Token::String(String::new()),
                ParamType::Bool => Token::Bool(false),
                ParamType::Uint(_) => Token::Uint(U256::zero()),
                ParamType::Address => Token::Address(Address::ZERO),
            });
        }
        self.transact("mint", &args, opts).await
    }
}
