// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Provider construction
//!
//! Providers are built once per batch and reused for every address in it. A
//! failure here is the only error that affects a whole batch.

use api_client::{AssetProvider, BalanceProvider};
use external_apis::{OpenSeaClient, OpenSeaConfig, RpcClient, RpcConfig};
use tracing::debug;

use crate::error::CheckerError;

/// The pair of providers a batch runs with
#[derive(Debug)]
pub struct Providers<A, B> {
    /// Indexing API provider
    pub assets: A,
    /// Chain provider
    pub balances: B,
}

/// Builds the providers for a batch
pub trait ProviderFactory: Send + Sync {
    /// Indexing API provider type
    type Assets: AssetProvider;
    /// Chain provider type
    type Balances: BalanceProvider;

    /// Build both providers
    ///
    /// # Errors
    ///
    /// Returns an error if either provider cannot be set up
    fn connect(
        &self,
    ) -> impl Future<Output = Result<Providers<Self::Assets, Self::Balances>, CheckerError>> + Send;
}

/// Factory for the OpenSea and JSON-RPC providers
#[derive(Debug, Clone)]
pub struct DefaultProviderFactory {
    opensea: OpenSeaConfig,
    rpc: RpcConfig,
    verify_chain: bool,
}

impl DefaultProviderFactory {
    /// Create a factory from client configurations
    pub fn new(opensea: OpenSeaConfig, rpc: RpcConfig) -> Self {
        Self {
            opensea,
            rpc,
            verify_chain: false,
        }
    }

    /// Check the RPC endpoint's chain ID before every batch
    #[must_use]
    pub fn with_chain_verification(mut self, verify_chain: bool) -> Self {
        self.verify_chain = verify_chain;
        self
    }
}

impl ProviderFactory for DefaultProviderFactory {
    type Assets = OpenSeaClient;
    type Balances = RpcClient;

    async fn connect(&self) -> Result<Providers<OpenSeaClient, RpcClient>, CheckerError> {
        let assets = OpenSeaClient::new(self.opensea.clone())?;
        let balances = RpcClient::new(self.rpc.clone())?;

        if self.verify_chain {
            balances.verify_chain(self.opensea.chain).await?;
        }

        debug!(
            chain = %self.opensea.chain,
            verified = self.verify_chain,
            "providers ready"
        );
        Ok(Providers { assets, balances })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_without_verification_makes_no_calls() {
        let rpc = RpcConfig {
            url: "http://127.0.0.1:1".to_string(),
            ..RpcConfig::default()
        };
        let factory = DefaultProviderFactory::new(OpenSeaConfig::default_test(), rpc);

        let providers = factory.connect().await.unwrap();
        assert_eq!(providers.assets.name(), "opensea");
        assert_eq!(providers.balances.name(), "rpc");
    }

    #[tokio::test]
    async fn invalid_configuration_fails_setup() {
        let opensea = OpenSeaConfig {
            page_limit: 0,
            ..OpenSeaConfig::default_test()
        };
        let factory = DefaultProviderFactory::new(opensea, RpcConfig::default());
        assert!(matches!(
            factory.connect().await.unwrap_err(),
            CheckerError::AssetProvider(_)
        ));

        let rpc = RpcConfig {
            url: "no scheme".to_string(),
            ..RpcConfig::default()
        };
        let factory = DefaultProviderFactory::new(OpenSeaConfig::default_test(), rpc);
        assert!(matches!(
            factory.connect().await.unwrap_err(),
            CheckerError::BalanceProvider(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_node_fails_verification() {
        let rpc = RpcConfig {
            url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
            ..RpcConfig::default()
        };
        let factory = DefaultProviderFactory::new(OpenSeaConfig::default_test(), rpc)
            .with_chain_verification(true);
        assert!(matches!(
            factory.connect().await.unwrap_err(),
            CheckerError::BalanceProvider(_)
        ));
    }
}
