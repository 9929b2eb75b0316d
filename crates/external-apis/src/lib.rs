// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Data source integrations for NFT ownership checks
//!
//! This crate provides the concrete providers the wallet checker talks to:
//!
//! - **Indexing API**: [`opensea::OpenSeaClient`] implements `AssetProvider` and
//!   lists the tokens of a collection held by a wallet, with names and images
//! - **Chain RPC**: [`rpc::RpcClient`] implements `BalanceProvider` and reads
//!   `balanceOf` from the collection contract, retrying with a constant delay
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] rejects blank credentials
//!
//! Both clients are exercised against wiremock servers in the integration tests.

pub mod non_empty_string;
pub mod opensea;
pub mod rpc;

pub use non_empty_string::NonEmptyString;
pub use opensea::*;
pub use rpc::*;
