// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Chains a collection can be checked on
//!
//! Each chain carries its EIP-155 id, checked against `eth_chainId` at startup,
//! and the slug the indexing API and marketplace use in their paths.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Chain hosting the checked collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ToSchema)]
pub enum ChainId {
    /// Ethereum mainnet
    #[default]
    Ethereum = 1,
    /// Polygon PoS, `matic` on the indexing API
    Polygon = 137,
    /// Base mainnet
    Base = 8453,
}

impl ChainId {
    /// EIP-155 chain id
    pub const fn chain_id(self) -> u64 {
        self as u64
    }

    /// Display name used in logs and the health report
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Polygon => "Polygon",
            Self::Base => "Base",
        }
    }

    /// Path segment on the indexing API and marketplace
    ///
    /// e.g. `/chain/ethereum/account/{address}/nfts` and
    /// `https://opensea.io/assets/ethereum/{contract}/{token_id}`
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Polygon => "matic",
            Self::Base => "base",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChainId {
    type Err = ChainIdParseError;

    /// Accepts a numeric id, a name, or a slug, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u64>() {
            return Self::try_from(id);
        }

        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "polygon" | "matic" => Ok(Self::Polygon),
            "base" => Ok(Self::Base),
            _ => Err(ChainIdParseError::InvalidName(s.to_string())),
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = ChainIdParseError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Ethereum),
            137 => Ok(Self::Polygon),
            8453 => Ok(Self::Base),
            _ => Err(ChainIdParseError::InvalidId(id)),
        }
    }
}

impl Serialize for ChainId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.chain_id())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    /// Environment variables arrive as strings, config files as numbers
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Self::try_from(id),
            Raw::Text(text) => text.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

/// Error type for chain parsing
#[derive(Debug, thiserror::Error)]
pub enum ChainIdParseError {
    /// Numeric id with no indexing API slug
    #[error("unsupported chain ID {0} (expected 1, 137 or 8453)")]
    InvalidId(u64),
    /// Name that matches no supported chain
    #[error("unsupported chain name {0:?} (expected ethereum, polygon or base)")]
    InvalidName(String),
}
