// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory providers with call counters

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use alloy_primitives::Address;
use api_client::{AssetProvider, AssetSummary, BalanceProvider, ProviderError};
use external_apis::RpcError;

use crate::{
    error::CheckerError,
    factory::{ProviderFactory, Providers},
};

pub(crate) fn addr(byte: u8) -> Address {
    Address::from([byte; 20])
}

pub(crate) fn addr_str(byte: u8) -> String {
    addr(byte).to_string()
}

pub(crate) fn contract() -> Address {
    Address::from([0xc0; 20])
}

fn unavailable() -> ProviderError {
    ProviderError::Status {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeAssets {
    holdings: HashMap<Address, Vec<String>>,
    failing: HashSet<Address>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl FakeAssets {
    pub(crate) fn holding(mut self, owner: Address, ids: &[&str]) -> Self {
        self.holdings
            .insert(owner, ids.iter().map(ToString::to_string).collect());
        self
    }

    pub(crate) fn failing_for(mut self, owner: Address) -> Self {
        self.failing.insert(owner);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetProvider for FakeAssets {
    async fn get_owned_assets(
        &self,
        owner: Address,
        contract: Address,
    ) -> Result<Vec<AssetSummary>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&owner) {
            return Err(unavailable());
        }

        Ok(self
            .holdings
            .get(&owner)
            .map(|ids| {
                ids.iter()
                    .map(|id| AssetSummary::minimal(id.as_str(), "https://opensea.io", "ethereum", contract))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fake-assets"
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBalances {
    balances: HashMap<Address, u64>,
    failing: HashSet<Address>,
    calls: Arc<AtomicUsize>,
}

impl FakeBalances {
    pub(crate) fn with_balance(mut self, owner: Address, balance: u64) -> Self {
        self.balances.insert(owner, balance);
        self
    }

    pub(crate) fn failing_for(mut self, owner: Address) -> Self {
        self.failing.insert(owner);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BalanceProvider for FakeBalances {
    async fn get_token_balance(
        &self,
        owner: Address,
        _contract: Address,
    ) -> Result<u64, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&owner) {
            return Err(unavailable());
        }
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "fake-balances"
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeFactory {
    pub(crate) assets: FakeAssets,
    pub(crate) balances: FakeBalances,
    pub(crate) setup_error: Option<String>,
}

impl ProviderFactory for FakeFactory {
    type Assets = FakeAssets;
    type Balances = FakeBalances;

    async fn connect(&self) -> Result<Providers<FakeAssets, FakeBalances>, CheckerError> {
        if let Some(message) = &self.setup_error {
            return Err(CheckerError::BalanceProvider(RpcError::Config(
                message.clone(),
            )));
        }
        Ok(Providers {
            assets: self.assets.clone(),
            balances: self.balances.clone(),
        })
    }
}
