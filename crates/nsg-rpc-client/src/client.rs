//! HTTP implementation of [`ChainClient`].

use async_trait::async_trait;
use nsg_types::{AssetBalance, BlockHeader, ChainClient, ChainClientError, Transaction};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::types::{
    broadcast_rejection, decode_response, AssetBalanceResponse, BalanceResponse, BlockResponse,
    HeightResponse, TransactionsResponse,
};

/// Network magic expected by the peer endpoint.
pub const NETWORK_MAGIC: &str = "594fe0f3";

/// Peer protocol version header value.
pub const PEER_VERSION: &str = "''";

/// Errors building the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// NSG node API client.
pub struct NsgRpcClient {
    client: Client,
    config: ClientConfig,
}

impl NsgRpcClient {
    /// Create a client for `config.server_api`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, request: RequestBuilder) -> Result<(u16, String), ChainClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ChainClientError::Connection(format!("Cannot connect to {}", self.config.server_api))
            } else if e.is_timeout() {
                ChainClientError::Connection(format!("Request timed out: {}", e))
            } else {
                ChainClientError::Connection(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ChainClientError::InvalidResponse(e.to_string()))?;
        Ok((status, body))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainClientError> {
        let url = self.config.url(path);
        debug!(%url, "GET");
        let (status, body) = self.send(self.client.get(&url)).await?;
        decode_response(status, &body)
    }

    fn peer_post(&self, body: &Value) -> RequestBuilder {
        self.client
            .post(self.config.url("/peer/transactions"))
            .header("magic", NETWORK_MAGIC)
            .header("version", PEER_VERSION)
            .json(body)
    }
}

#[async_trait]
impl ChainClient for NsgRpcClient {
    async fn get_height(&self) -> Result<u64, ChainClientError> {
        let response: HeightResponse = self.get("/api/blocks/getHeight").await?;
        Ok(response.height)
    }

    async fn get_block_by_height(&self, height: u64) -> Result<BlockHeader, ChainClientError> {
        let response: BlockResponse = self
            .get(&format!("/api/blocks/get?height={}", height))
            .await?;
        response
            .block
            .ok_or_else(|| ChainClientError::NotFound(format!("block at height {}", height)))
    }

    async fn get_transactions_by_block(
        &self,
        block_id: &str,
    ) -> Result<Vec<Transaction>, ChainClientError> {
        let response: TransactionsResponse = self
            .get(&format!("/api/transactions?blockId={}", block_id))
            .await?;
        Ok(response.transactions)
    }

    async fn get_transaction(&self, id: &str) -> Result<Transaction, ChainClientError> {
        let response: TransactionsResponse = self
            .get(&format!("/api/uia/transactions/get?id={}", id))
            .await?;
        response
            .transactions
            .into_iter()
            .next()
            .ok_or_else(|| ChainClientError::NotFound(format!("transaction {}", id)))
    }

    async fn get_balance(&self, address: &str) -> Result<u64, ChainClientError> {
        let response: BalanceResponse = self
            .get(&format!("/api/accounts/getBalance?address={}", address))
            .await?;
        Ok(response.balance)
    }

    async fn get_asset_balance(
        &self,
        address: &str,
        currency: &str,
    ) -> Result<AssetBalance, ChainClientError> {
        let response: AssetBalanceResponse = self
            .get(&format!("/api/uia/balances/{}/{}", address, currency))
            .await?;
        response
            .balance
            .ok_or_else(|| ChainClientError::NotFound(format!("{} balance of {}", currency, address)))
    }

    async fn broadcast(&self, signed_tx_json: &str, retries: u32) -> Result<(), ChainClientError> {
        let transaction: Value = serde_json::from_str(signed_tx_json).map_err(|e| {
            ChainClientError::InvalidResponse(format!("signed transaction is not JSON: {}", e))
        })?;
        let body = json!({ "transaction": transaction });

        let attempts = retries.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            let (_, response) = self.send(self.peer_post(&body)).await?;
            match broadcast_rejection(&response) {
                None => {
                    info!(attempt, "transaction accepted by node");
                    return Ok(());
                }
                Some(reason) => {
                    warn!(attempt, attempts, %reason, "broadcast rejected");
                    last_error = reason;
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.broadcast_retry_delay()).await;
            }
        }

        Err(ChainClientError::BroadcastRejected {
            attempts,
            message: last_error,
        })
    }
}
