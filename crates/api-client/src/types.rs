// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Common data types returned by asset providers

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single token of the target collection owned by a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    /// Token identifier within the collection
    pub token_id: String,
    /// Token name (if the indexer knows one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Token image (if the indexer knows one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Link to the token on the marketplace, always populated
    pub external_url: String,
}

impl AssetSummary {
    /// Create a summary with only the identifier, linking to the marketplace page
    pub fn minimal(
        token_id: impl Into<String>,
        marketplace_url: &str,
        chain: &str,
        contract: Address,
    ) -> Self {
        let token_id = token_id.into();
        let external_url = Self::marketplace_link(marketplace_url, chain, contract, &token_id);
        Self {
            token_id,
            display_name: None,
            image_url: None,
            external_url,
        }
    }

    /// Build `{marketplace}/assets/{chain}/{contract}/{token_id}`
    pub fn marketplace_link(
        marketplace_url: &str,
        chain: &str,
        contract: Address,
        token_id: &str,
    ) -> String {
        format!(
            "{}/assets/{chain}/{contract}/{token_id}",
            marketplace_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn marketplace_link_format() {
        let contract = Address::from_str("0xd887090fc6f9af10abe6cf287ac8011a3cb55a65").unwrap();
        let link =
            AssetSummary::marketplace_link("https://opensea.io/", "ethereum", contract, "42");
        assert_eq!(
            link,
            format!("https://opensea.io/assets/ethereum/{contract}/42")
        );
        assert!(!link.contains("io//assets"));
    }

    #[test]
    fn minimal_summary() {
        let summary = AssetSummary::minimal("7", "https://opensea.io", "ethereum", Address::ZERO);
        assert_eq!(summary.token_id, "7");
        assert!(summary.display_name.is_none());
        assert!(summary.image_url.is_none());
        assert!(summary.external_url.ends_with("/7"));
    }

    #[test]
    fn serializes_camel_case_without_absent_fields() {
        let summary = AssetSummary::minimal("1", "https://opensea.io", "ethereum", Address::ZERO);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["tokenId"], "1");
        assert!(value.get("externalUrl").is_some());
        assert!(value.get("displayName").is_none());
        assert!(value.get("imageUrl").is_none());
    }
}
