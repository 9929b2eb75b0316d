// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Per-address check results
//!
//! [`AddressCheckResult`] can only be built through the constructors below, so
//! every record upholds these rules:
//!
//! - a record with `has_token == true` never reports a token count of zero
//! - a hard failure always reports `has_token == false`
//! - chain records never carry token identifiers or assets

use std::fmt;

use api_client::{AssetSummary, ProviderError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message for input that fails address validation
pub const INVALID_ADDRESS: &str = "Invalid address";

/// Message for a check that failed without a more specific reason
pub const UNKNOWN_ERROR: &str = "Unknown error checking wallet";

/// Notice attached to a holder found on chain after the indexing API failed
pub const DEGRADED_NOTICE: &str =
    "Token identifiers unavailable: indexing API failed, balance read from chain";

/// Data source that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultSource {
    /// The indexing API
    IndexApi,
    /// A `balanceOf` read through JSON-RPC
    Chain,
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexApi => f.write_str("INDEX_API"),
            Self::Chain => f.write_str("CHAIN"),
        }
    }
}

/// Outcome of checking one address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressCheckResult {
    /// The input with surrounding whitespace removed
    address: String,
    has_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assets: Option<Vec<AssetSummary>>,
    source: ResultSource,
    /// Failure text, or the degraded-success notice
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl AddressCheckResult {
    fn failure(address: &str, source: ResultSource, message: String) -> Self {
        Self {
            address: address.trim().to_string(),
            has_token: false,
            token_count: None,
            token_ids: None,
            assets: None,
            source,
            error_message: Some(message),
        }
    }

    /// Record for input that is not a valid address
    pub fn invalid(address: &str, source: ResultSource) -> Self {
        Self::failure(address, source, INVALID_ADDRESS.to_string())
    }

    /// Record for a check that did not finish or failed unexpectedly
    pub fn unknown_error(address: &str, source: ResultSource) -> Self {
        Self::failure(address, source, UNKNOWN_ERROR.to_string())
    }

    /// Record for a batch whose providers could not be set up
    pub fn service_error(address: &str, reason: impl fmt::Display) -> Self {
        Self::failure(
            address,
            ResultSource::IndexApi,
            format!("Service error: {reason}"),
        )
    }

    /// Record for a failed chain read
    pub fn chain_failure(address: &str, error: &ProviderError) -> Self {
        Self::failure(
            address,
            ResultSource::Chain,
            format!("Error checking wallet on chain: {error}"),
        )
    }

    /// Record built from the assets the indexing API returned
    pub fn from_assets(address: &str, assets: Vec<AssetSummary>) -> Self {
        let token_ids = assets.iter().map(|asset| asset.token_id.clone()).collect();
        Self {
            address: address.trim().to_string(),
            has_token: !assets.is_empty(),
            token_count: Some(assets.len() as u64),
            token_ids: Some(token_ids),
            assets: Some(assets),
            source: ResultSource::IndexApi,
            error_message: None,
        }
    }

    /// Record built from an on-chain balance
    pub fn from_balance(address: &str, balance: u64) -> Self {
        Self {
            address: address.trim().to_string(),
            has_token: balance > 0,
            token_count: Some(balance),
            token_ids: None,
            assets: None,
            source: ResultSource::Chain,
            error_message: None,
        }
    }

    /// Record built from an on-chain balance read after the indexing API failed
    ///
    /// Holders get [`DEGRADED_NOTICE`] since their token identifiers are unknown.
    pub fn degraded(address: &str, balance: u64) -> Self {
        let mut result = Self::from_balance(address, balance);
        if result.has_token {
            result.error_message = Some(DEGRADED_NOTICE.to_string());
        }
        result
    }

    /// Checked address, trimmed
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether the wallet holds at least one token of the collection
    pub fn has_token(&self) -> bool {
        self.has_token
    }

    /// Number of tokens held, when the source could count them
    pub fn token_count(&self) -> Option<u64> {
        self.token_count
    }

    /// Token identifiers, indexing API only
    pub fn token_ids(&self) -> Option<&[String]> {
        self.token_ids.as_deref()
    }

    /// Token details, indexing API only
    pub fn assets(&self) -> Option<&[AssetSummary]> {
        self.assets.as_deref()
    }

    /// Source that produced this record
    pub fn source(&self) -> ResultSource {
        self.source
    }

    /// Failure text or degraded notice
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Holder found on chain after an indexing failure
    pub fn is_degraded(&self) -> bool {
        self.has_token && self.error_message.is_some()
    }

    /// The check failed and the holding status is unknown
    pub fn is_failure(&self) -> bool {
        !self.has_token && self.error_message.is_some()
    }
}
