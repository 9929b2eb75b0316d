// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Ethereum JSON-RPC integration
//!
//! This module provides an implementation of the `BalanceProvider` trait that
//! reads `balanceOf(address)` straight from the collection contract through a
//! JSON-RPC node. Unlike the indexing API it only yields a token count, but it
//! has no third-party rate limits beyond the node itself.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};
use api_client::{BalanceProvider, ProviderError};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use shared_types::ChainId;
use thiserror::Error;
use tokio::time::timeout;
use tokio_retry::{Retry, strategy::FixedInterval};
use tracing::{debug, info, warn};
use url::Url;

// RPC constants
const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
const DEFAULT_RPC_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_RPC_MAX_RETRIES: usize = 2;
const DEFAULT_RPC_RETRY_DELAY_MS: u64 = 500;

sol! {
    interface IERC721 {
        function balanceOf(address owner) external view returns (uint256 balance);
    }
}

/// Configuration for the JSON-RPC client
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL
    pub url: String,
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    /// Retries after the first failed `balanceOf` attempt
    pub max_retries: usize,
    /// Constant delay between attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            timeout_seconds: DEFAULT_RPC_TIMEOUT_SECONDS,
            max_retries: DEFAULT_RPC_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RPC_RETRY_DELAY_MS,
        }
    }
}

/// JSON-RPC client reading collection balances
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    url: Url,
    config: RpcConfig,
    next_id: AtomicU64,
}

/// Errors specific to the JSON-RPC client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RpcError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Node answered with a non-success HTTP status
    #[error("RPC endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response carried neither a result nor an error
    #[error("RPC response is missing a result")]
    MissingResult,

    /// Result could not be decoded
    #[error("Invalid RPC result: {0}")]
    InvalidResult(String),

    /// Node serves a different chain than configured
    #[error("RPC endpoint serves chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout { seconds: u64 },
}

impl From<RpcError> for ProviderError {
    fn from(value: RpcError) -> Self {
        match value {
            RpcError::Http(error) => ProviderError::Http {
                message: error.to_string(),
            },
            RpcError::Json(error) => ProviderError::InvalidResponse {
                message: error.to_string(),
            },
            RpcError::Status { status, message } => ProviderError::Status { status, message },
            RpcError::Rpc { code, message } => ProviderError::Rpc { code, message },
            RpcError::MissingResult | RpcError::InvalidResult(_) => {
                ProviderError::InvalidResponse {
                    message: value.to_string(),
                }
            }
            RpcError::ChainMismatch { .. } | RpcError::Config(_) => {
                ProviderError::Configuration {
                    message: value.to_string(),
                }
            }
            RpcError::Timeout { seconds } => ProviderError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct CallRequest {
    to: Address,
    data: Bytes,
}

impl RpcClient {
    /// Create a new JSON-RPC client
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let url = Url::parse(&config.url)
            .map_err(|e| RpcError::Config(format!("invalid RPC URL: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("nft-holder-checker/0.1.0")
            .build()
            .map_err(RpcError::Http)?;

        Ok(Self {
            client,
            url,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    /// Check that the endpoint is reachable and serves `expected`
    ///
    /// # Errors
    ///
    /// Returns an error if `eth_chainId` fails or reports another chain
    pub async fn verify_chain(&self, expected: ChainId) -> Result<(), RpcError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        let actual = u64::from_str_radix(raw.trim_start_matches("0x"), 16)
            .map_err(|e| RpcError::InvalidResult(format!("chain id {raw}: {e}")))?;

        if actual != expected.chain_id() {
            return Err(RpcError::ChainMismatch {
                expected: expected.chain_id(),
                actual,
            });
        }

        info!(chain = %expected, url = %self.url, "RPC endpoint verified");
        Ok(())
    }

    /// Read the collection balance of `owner`, retrying with a constant delay
    ///
    /// Makes at most `1 + max_retries` attempts. The error of the last attempt
    /// is returned once the budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error if every attempt fails
    pub async fn balance_of(&self, owner: Address, contract: Address) -> Result<u64, RpcError> {
        let strategy =
            FixedInterval::from_millis(self.config.retry_delay_ms).take(self.config.max_retries);

        let mut attempt = 0_usize;
        Retry::spawn(strategy, || {
            attempt += 1;
            let attempt = attempt;
            async move {
                self.balance_of_once(owner, contract)
                    .await
                    .inspect_err(|e| {
                        warn!(%owner, attempt, error = %e, "balanceOf attempt failed");
                    })
            }
        })
        .await
    }

    /// Single `balanceOf` call without retry
    async fn balance_of_once(&self, owner: Address, contract: Address) -> Result<u64, RpcError> {
        let call = CallRequest {
            to: contract,
            data: IERC721::balanceOfCall { owner }.abi_encode().into(),
        };

        let raw: Bytes = self.request("eth_call", (call, "latest")).await?;
        let balance = decode_balance(&raw)?;

        debug!(%owner, %contract, balance, "balanceOf succeeded");
        Ok(balance)
    }

    /// Send one JSON-RPC request and extract its result
    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            self.client.post(self.url.clone()).json(&body).send(),
        )
        .await
        .map_err(|_| RpcError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(RpcError::Http)?;

        let status = response.status();
        let text = response.text().await.map_err(RpcError::Http)?;

        if !status.is_success() {
            return Err(RpcError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: JsonRpcResponse<R> = serde_json::from_str(&text).map_err(RpcError::Json)?;

        if let Some(error) = parsed.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        parsed.result.ok_or(RpcError::MissingResult)
    }
}

/// Decode an ABI-encoded `uint256`, saturating at `u64::MAX`
fn decode_balance(raw: &[u8]) -> Result<u64, RpcError> {
    if raw.len() != 32 {
        return Err(RpcError::InvalidResult(format!(
            "expected 32 bytes for uint256, got {}",
            raw.len()
        )));
    }

    let value = U256::from_be_slice(raw);
    Ok(u64::try_from(value).unwrap_or(u64::MAX))
}

impl BalanceProvider for RpcClient {
    async fn get_token_balance(
        &self,
        owner: Address,
        contract: Address,
    ) -> Result<u64, ProviderError> {
        Ok(self.balance_of(owner, contract).await?)
    }

    fn name(&self) -> &'static str {
        "rpc"
    }
}
