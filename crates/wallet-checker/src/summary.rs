// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Batch summaries and address selections

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::result::AddressCheckResult;

/// Counts over the results of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Number of records
    pub total: usize,
    /// Records holding at least one token, degraded ones included
    pub holders: usize,
    /// Records confirmed to hold no token
    pub non_holders: usize,
    /// Records whose check failed
    pub errors: usize,
    /// Holders found on chain after an indexing failure
    pub degraded: usize,
}

impl BatchSummary {
    /// Summarize `results`
    pub fn from_results(results: &[AddressCheckResult]) -> Self {
        results.iter().fold(
            Self {
                total: results.len(),
                ..Self::default()
            },
            |mut summary, result| {
                if result.has_token() {
                    summary.holders += 1;
                    if result.is_degraded() {
                        summary.degraded += 1;
                    }
                } else if result.is_failure() {
                    summary.errors += 1;
                } else {
                    summary.non_holders += 1;
                }
                summary
            },
        )
    }
}

/// Which addresses to select from a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AddressFilter {
    /// Every address that was checked successfully
    #[default]
    All,
    /// Addresses holding at least one token
    Holders,
    /// Addresses holding no token
    NonHolders,
}

/// Addresses matching `filter`, in input order
///
/// Failed checks are always left out since their holding status is unknown.
pub fn filter_addresses(results: &[AddressCheckResult], filter: AddressFilter) -> Vec<&str> {
    results
        .iter()
        .filter(|result| !result.is_failure())
        .filter(|result| match filter {
            AddressFilter::All => true,
            AddressFilter::Holders => result.has_token(),
            AddressFilter::NonHolders => !result.has_token(),
        })
        .map(AddressCheckResult::address)
        .collect()
}
