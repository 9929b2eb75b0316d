// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wallet verification pipeline
//!
//! This crate checks an ordered list of user-supplied addresses against one NFT
//! collection. Each address is validated, then looked up through the indexing
//! API. After the first indexing failure in a batch, every remaining address is
//! read from the chain instead.
//!
//! # Architecture
//!
//! - [`validation`]: address syntax and EIP-55 checksum checks, no I/O
//! - [`result`]: [`AddressCheckResult`], one record per input address
//! - [`fallback`]: [`FallbackController`] and the per-batch [`FallbackState`]
//! - [`factory`]: [`ProviderFactory`] builds the providers once per batch
//! - [`batch`]: [`BatchRunner`], sequential iteration with delay, deadline and cancellation
//! - [`summary`]: [`BatchSummary`] counts and [`AddressFilter`] selections
//!
//! Per-address failures never escape the pipeline; they become records.

pub mod batch;
pub mod error;
pub mod factory;
pub mod fallback;
pub mod result;
pub mod summary;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{BatchProgress, BatchReport, BatchRunner, BatchSettings};
pub use error::CheckerError;
pub use factory::{DefaultProviderFactory, ProviderFactory, Providers};
pub use fallback::{FallbackController, FallbackState};
pub use result::{AddressCheckResult, ResultSource};
pub use summary::{AddressFilter, BatchSummary, filter_addresses};
pub use validation::{is_valid_address, parse_address};
