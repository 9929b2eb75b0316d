// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Indexing API to chain fallback
//!
//! The indexing API is preferred since it returns token identifiers and
//! metadata. The first time it fails in a batch, [`FallbackState`] is switched
//! and the remaining addresses are read from the chain only, without going back
//! to the indexing API.

use alloy_primitives::Address;
use api_client::{AssetProvider, BalanceProvider};
use tracing::{debug, warn};

use crate::{
    result::{AddressCheckResult, ResultSource},
    validation::parse_address,
};

/// Fallback flag for one batch
///
/// Created fresh for every batch and passed to each [`FallbackController::check`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackState {
    index_api_failed: bool,
}

impl FallbackState {
    /// State of a batch that has not seen an indexing failure yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the indexing API has failed during this batch
    pub fn is_degraded(&self) -> bool {
        self.index_api_failed
    }

    /// Source the next address will be checked with
    pub fn next_source(&self) -> ResultSource {
        if self.index_api_failed {
            ResultSource::Chain
        } else {
            ResultSource::IndexApi
        }
    }

    fn mark_index_api_failed(&mut self) {
        self.index_api_failed = true;
    }
}

/// Checks single addresses, falling back from the indexing API to the chain
#[derive(Debug)]
pub struct FallbackController<A, B> {
    assets: A,
    balances: B,
}

impl<A, B> FallbackController<A, B>
where
    A: AssetProvider,
    B: BalanceProvider,
{
    /// Create a controller over the two providers
    pub fn new(assets: A, balances: B) -> Self {
        Self { assets, balances }
    }

    /// Check one raw address
    ///
    /// Never fails: invalid input and provider errors are returned as records.
    /// Invalid input is rejected before any provider is called.
    pub async fn check(
        &self,
        raw: &str,
        contract: Address,
        state: &mut FallbackState,
    ) -> AddressCheckResult {
        let address = raw.trim();
        let Some(owner) = parse_address(address) else {
            debug!(address, "rejecting invalid address");
            return AddressCheckResult::invalid(address, state.next_source());
        };

        if state.is_degraded() {
            return self.check_on_chain(address, owner, contract, false).await;
        }

        match self.assets.get_owned_assets(owner, contract).await {
            Ok(assets) => {
                debug!(
                    %owner,
                    provider = self.assets.name(),
                    count = assets.len(),
                    "ownership read from indexing API"
                );
                AddressCheckResult::from_assets(address, assets)
            }
            Err(e) => {
                warn!(
                    %owner,
                    provider = self.assets.name(),
                    error = %e,
                    transport = e.is_transport(),
                    "indexing API failed, reading remaining addresses from chain"
                );
                state.mark_index_api_failed();
                self.check_on_chain(address, owner, contract, true).await
            }
        }
    }

    async fn check_on_chain(
        &self,
        address: &str,
        owner: Address,
        contract: Address,
        after_index_failure: bool,
    ) -> AddressCheckResult {
        match self.balances.get_token_balance(owner, contract).await {
            Ok(balance) => {
                debug!(
                    %owner,
                    provider = self.balances.name(),
                    balance,
                    "ownership read from chain"
                );
                if after_index_failure {
                    AddressCheckResult::degraded(address, balance)
                } else {
                    AddressCheckResult::from_balance(address, balance)
                }
            }
            Err(e) => {
                warn!(
                    %owner,
                    provider = self.balances.name(),
                    error = %e,
                    transport = e.is_transport(),
                    "chain read failed"
                );
                AddressCheckResult::chain_failure(address, &e)
            }
        }
    }
}
