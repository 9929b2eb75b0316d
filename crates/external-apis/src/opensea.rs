// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! OpenSea v2 API integration
//!
//! This module provides an implementation of the `AssetProvider` trait for the
//! OpenSea v2 API. OpenSea indexes on-chain ownership together with token
//! metadata, so a single request returns identifiers, names and images for the
//! tokens held by a wallet.

use std::time::Duration;

use alloy_primitives::Address;
use api_client::{AssetProvider, AssetSummary, ProviderError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared_types::ChainId;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, error, warn};
use url::Url;

use crate::non_empty_string::NonEmptyString;

// OpenSea API constants
const DEFAULT_OPENSEA_BASE_URL: &str = "https://api.opensea.io/api/v2";
const DEFAULT_MARKETPLACE_URL: &str = "https://opensea.io";
const DEFAULT_OPENSEA_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_PAGE_LIMIT: u32 = 50;
const MAX_PAGE_LIMIT: u32 = 200;

/// Configuration for the OpenSea API client
#[derive(Debug, Clone)]
pub struct OpenSeaConfig {
    /// Base URL for the OpenSea API
    pub base_url: String,
    /// API key sent in the `X-API-KEY` header
    pub api_key: NonEmptyString,
    /// Marketplace root used to build token links when OpenSea omits a permalink
    pub marketplace_url: String,
    /// Chain whose account endpoint is queried
    pub chain: ChainId,
    /// Number of tokens requested per call
    pub page_limit: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl OpenSeaConfig {
    /// Create a configuration with default endpoints for the given API key
    pub fn new(api_key: NonEmptyString) -> Self {
        Self {
            base_url: DEFAULT_OPENSEA_BASE_URL.to_string(),
            api_key,
            marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
            chain: ChainId::Ethereum,
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout_seconds: DEFAULT_OPENSEA_TIMEOUT_SECONDS,
        }
    }

    /// Create default configuration for testing
    #[allow(clippy::missing_panics_doc)]
    pub fn default_test() -> Self {
        Self::new(NonEmptyString::new("test-api-key").expect("known to be non-empty"))
    }
}

/// OpenSea API client implementation
#[derive(Debug)]
pub struct OpenSeaClient {
    client: Client,
    config: OpenSeaConfig,
}

/// Errors specific to the OpenSea API client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum OpenSeaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("OpenSea API error: {status} {message}")]
    ApiError { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Authentication failed
    #[error("Authentication failed")]
    Unauthorized,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout { seconds: u64 },
}

impl From<OpenSeaError> for ProviderError {
    fn from(value: OpenSeaError) -> Self {
        match value {
            OpenSeaError::Http(error) => ProviderError::Http {
                message: error.to_string(),
            },
            OpenSeaError::Json(error) => ProviderError::InvalidResponse {
                message: error.to_string(),
            },
            OpenSeaError::ApiError { status, message } => {
                ProviderError::Status { status, message }
            }
            OpenSeaError::RateLimited => ProviderError::RateLimitExceeded {
                retry_after_seconds: 1,
            },
            OpenSeaError::Unauthorized => ProviderError::Authentication {
                message: value.to_string(),
            },
            OpenSeaError::Config(message) => ProviderError::Configuration { message },
            OpenSeaError::Timeout { seconds } => ProviderError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

/// Response structure for the account NFTs endpoint
#[derive(Debug, Deserialize)]
pub struct OpenSeaAccountNftsResponse {
    /// Tokens held by the account, across all collections
    #[serde(default)]
    pub nfts: Vec<OpenSeaNft>,
    /// Cursor for the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

/// Individual NFT item from the account NFTs endpoint
#[derive(Debug, Deserialize)]
pub struct OpenSeaNft {
    /// Token identifier
    pub identifier: String,
    /// Contract address of the token
    pub contract: String,
    /// Token name
    #[serde(default)]
    pub name: Option<String>,
    /// Token image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Link to the token on OpenSea
    #[serde(default, alias = "opensea_url")]
    pub permalink: Option<String>,
}

impl OpenSeaClient {
    /// Create a new OpenSea API client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not a valid URL, the page limit is
    /// out of range, or the HTTP client cannot be created
    pub fn new(config: OpenSeaConfig) -> Result<Self, OpenSeaError> {
        Url::parse(&config.base_url)
            .map_err(|e| OpenSeaError::Config(format!("invalid base URL: {e}")))?;

        if config.page_limit == 0 || config.page_limit > MAX_PAGE_LIMIT {
            return Err(OpenSeaError::Config(format!(
                "page limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("nft-holder-checker/0.1.0")
            .build()
            .map_err(OpenSeaError::Http)?;

        Ok(Self { client, config })
    }

    /// Fetch one page of NFTs held by `owner` on the configured chain
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the response is
    /// not a success
    pub async fn get_account_nfts(
        &self,
        owner: Address,
    ) -> Result<OpenSeaAccountNftsResponse, OpenSeaError> {
        let url = format!(
            "{}/chain/{}/account/{}/nfts",
            self.config.base_url.trim_end_matches('/'),
            self.config.chain.slug(),
            owner
        );

        debug!(url, limit = self.config.page_limit, "fetching account NFTs from OpenSea");

        let request = self
            .client
            .get(&url)
            .query(&[("limit", self.config.page_limit)])
            .header("X-API-KEY", self.config.api_key.as_str())
            .header("accept", "application/json");

        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| OpenSeaError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(OpenSeaError::Http)?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await.map_err(OpenSeaError::Http)?;
                let nfts_response: OpenSeaAccountNftsResponse =
                    serde_json::from_str(&body).map_err(OpenSeaError::Json)?;
                Ok(nfts_response)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(OpenSeaError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(OpenSeaError::RateLimited),
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                warn!(status = status.as_u16(), error = error_text, "OpenSea API error");
                Err(OpenSeaError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }

    /// Keep only tokens of `contract` and convert them to summaries
    fn collection_assets(&self, nfts: Vec<OpenSeaNft>, contract: Address) -> Vec<AssetSummary> {
        nfts.into_iter()
            .filter(|nft| {
                nft.contract
                    .parse::<Address>()
                    .is_ok_and(|address| address == contract)
            })
            .map(|nft| self.convert_nft(nft, contract))
            .collect()
    }

    /// Convert an OpenSea NFT item to an asset summary
    fn convert_nft(&self, nft: OpenSeaNft, contract: Address) -> AssetSummary {
        let external_url = nft
            .permalink
            .filter(|permalink| !permalink.trim().is_empty())
            .unwrap_or_else(|| {
                AssetSummary::marketplace_link(
                    &self.config.marketplace_url,
                    self.config.chain.slug(),
                    contract,
                    &nft.identifier,
                )
            });

        AssetSummary {
            token_id: nft.identifier,
            display_name: nft.name,
            image_url: nft.image_url,
            external_url,
        }
    }
}

impl AssetProvider for OpenSeaClient {
    async fn get_owned_assets(
        &self,
        owner: Address,
        contract: Address,
    ) -> Result<Vec<AssetSummary>, ProviderError> {
        let response = self.get_account_nfts(owner).await.map_err(|e| {
            error!(%owner, error = %e, "failed to fetch account NFTs from OpenSea");
            e
        })?;

        let total = response.nfts.len();
        let assets = self.collection_assets(response.nfts, contract);

        debug!(
            %owner,
            %contract,
            total,
            matching = assets.len(),
            has_more = response.next.is_some(),
            "filtered OpenSea NFTs by contract"
        );

        Ok(assets)
    }

    fn name(&self) -> &'static str {
        "opensea"
    }
}
