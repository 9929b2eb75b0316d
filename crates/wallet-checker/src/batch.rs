// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Sequential batch execution
//!
//! Addresses are checked one at a time, in input order, with a fixed delay
//! between consecutive addresses to stay under the indexing API's rate limits.
//! Every input address yields exactly one record unless the batch is cancelled.

use std::time::Duration;

use alloy_primitives::Address;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::{
    factory::ProviderFactory,
    fallback::{FallbackController, FallbackState},
    result::AddressCheckResult,
    summary::BatchSummary,
};

/// Default pause between consecutive addresses
pub const DEFAULT_ADDRESS_DELAY: Duration = Duration::from_millis(500);

/// Default deadline for checking a single address
pub const DEFAULT_ADDRESS_TIMEOUT: Duration = Duration::from_secs(60);

/// Timing settings for a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSettings {
    /// Pause between consecutive addresses, none after the last one
    pub address_delay: Duration,
    /// Deadline for one address, covering both providers and their retries
    pub address_timeout: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            address_delay: DEFAULT_ADDRESS_DELAY,
            address_timeout: DEFAULT_ADDRESS_TIMEOUT,
        }
    }
}

/// Progress after each checked address
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    /// Addresses checked so far
    pub completed: usize,
    /// Addresses in the batch
    pub total: usize,
    /// Results so far, in input order
    pub results: &'a [AddressCheckResult],
}

/// Results of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// One record per checked address, in input order
    pub results: Vec<AddressCheckResult>,
    /// Whether the batch stopped before checking every address
    pub cancelled: bool,
}

impl BatchReport {
    /// Counts over the results
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(&self.results)
    }
}

/// Runs batches of address checks
#[derive(Debug)]
pub struct BatchRunner<F> {
    factory: F,
    settings: BatchSettings,
}

impl<F: ProviderFactory> BatchRunner<F> {
    /// Create a runner that builds its providers with `factory`
    pub fn new(factory: F, settings: BatchSettings) -> Self {
        Self { factory, settings }
    }

    /// Timing settings of this runner
    pub fn settings(&self) -> BatchSettings {
        self.settings
    }

    /// Check every address against `contract`
    ///
    /// Returns one record per input address, in input order.
    pub async fn check_addresses(
        &self,
        addresses: &[String],
        contract: Address,
    ) -> Vec<AddressCheckResult> {
        self.check_addresses_with_progress(addresses, contract, &CancellationToken::new(), |_| {})
            .await
            .results
    }

    /// Check every address against `contract`, reporting progress after each one
    ///
    /// `cancel` is checked before each address and during the delay between
    /// addresses. A cancelled batch returns the records gathered so far.
    pub async fn check_addresses_with_progress<P>(
        &self,
        addresses: &[String],
        contract: Address,
        cancel: &CancellationToken,
        mut on_progress: P,
    ) -> BatchReport
    where
        P: FnMut(BatchProgress<'_>),
    {
        let total = addresses.len();

        let providers = match self.factory.connect().await {
            Ok(providers) => providers,
            Err(e) => {
                error!(error = %e, total, "provider setup failed, failing every address");
                let results: Vec<_> = addresses
                    .iter()
                    .map(|address| AddressCheckResult::service_error(address, &e))
                    .collect();
                on_progress(BatchProgress {
                    completed: total,
                    total,
                    results: &results,
                });
                return BatchReport {
                    results,
                    cancelled: false,
                };
            }
        };

        let controller = FallbackController::new(providers.assets, providers.balances);
        let mut state = FallbackState::new();
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, raw) in addresses.iter().enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            if index > 0 && !self.settings.address_delay.is_zero() {
                tokio::select! {
                    () = cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    () = sleep(self.settings.address_delay) => {}
                }
            }

            let result = match timeout(
                self.settings.address_timeout,
                controller.check(raw, contract, &mut state),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        address = raw.trim(),
                        timeout_ms = self.settings.address_timeout.as_millis(),
                        "address check timed out"
                    );
                    AddressCheckResult::unknown_error(raw, state.next_source())
                }
            };

            results.push(result);
            on_progress(BatchProgress {
                completed: results.len(),
                total,
                results: &results,
            });
        }

        let summary = BatchSummary::from_results(&results);
        info!(
            total,
            checked = summary.total,
            holders = summary.holders,
            errors = summary.errors,
            degraded = state.is_degraded(),
            cancelled,
            "batch finished"
        );

        BatchReport { results, cancelled }
    }
}
