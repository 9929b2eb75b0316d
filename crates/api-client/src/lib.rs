// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Provider traits and shared types for NFT ownership data sources
//!
//! This crate provides the abstractions the wallet checker is written against,
//! so that the indexing API and the chain RPC can be swapped or faked in tests.
//!
//! # Core Abstractions
//!
//! - **`AssetProvider` Trait**: lists the tokens of one collection held by a wallet
//! - **`BalanceProvider` Trait**: reads the token count of a wallet from the chain
//! - **Error Handling**: [`ProviderError`] covers transport, response and setup failures
//! - **Data Types**: [`AssetSummary`] describes a single owned token

use alloy_primitives::Address;
use thiserror::Error;

pub mod types;

pub use types::*;

/// Source of per-token ownership data, typically an indexing API
///
/// Implementations perform exactly one request per call. Retrying is left to
/// the caller.
pub trait AssetProvider: Send + Sync {
    /// Get the tokens of `contract` owned by `owner`
    ///
    /// # Returns
    ///
    /// * `Ok(assets)` with one entry per owned token, possibly empty
    /// * `Err(error)` on a transport failure or a non-success response
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response status is not a
    /// success, or the payload cannot be parsed
    fn get_owned_assets(
        &self,
        owner: Address,
        contract: Address,
    ) -> impl Future<Output = Result<Vec<AssetSummary>, ProviderError>> + Send;

    /// Get the name/identifier of this provider
    fn name(&self) -> &'static str;
}

/// Source of token balances read directly from the chain
pub trait BalanceProvider: Send + Sync {
    /// Get the number of `contract` tokens held by `owner`
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails after the provider's own retry
    /// budget, the contract reverts, or the result cannot be decoded
    fn get_token_balance(
        &self,
        owner: Address,
        contract: Address,
    ) -> impl Future<Output = Result<u64, ProviderError>> + Send;

    /// Get the name/identifier of this provider
    fn name(&self) -> &'static str;
}

/// Common errors that can occur when working with data providers
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ProviderError {
    /// Transport level failure (connection refused, DNS, TLS, ...)
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// The service answered with a non-success status
    #[error("Unexpected response status {status}: {message}")]
    Status { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimitExceeded { retry_after_seconds: u64 },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Invalid response format
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// JSON-RPC error object, including contract reverts
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl ProviderError {
    /// Whether the failure happened before a response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Timeout { .. })
    }
}
