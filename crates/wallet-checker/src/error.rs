// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Batch-level errors
//!
//! Only provider setup can fail a whole batch. Everything that happens to a
//! single address is folded into its [`AddressCheckResult`](crate::AddressCheckResult).

use external_apis::{OpenSeaError, RpcError};
use thiserror::Error;

/// Errors raised while preparing a batch
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The indexing API client could not be built
    #[error("indexing API client: {0}")]
    AssetProvider(#[from] OpenSeaError),

    /// The RPC client could not be built or failed its chain check
    #[error("RPC client: {0}")]
    BalanceProvider(#[from] RpcError),
}
