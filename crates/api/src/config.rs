// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the holder checker
//! server: the HTTP listener, the two data providers and the batch pipeline.
//! Values are validated while loading so a bad deployment fails at startup.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use alloy_primitives::Address;
use anyhow::{Result, anyhow, ensure};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use external_apis::{NonEmptyString, OpenSeaConfig, RpcConfig};
use serde::{Deserialize, Deserializer, Serialize, de};
use shared_types::ChainId;
use url::Url;
use wallet_checker::BatchSettings;

use crate::error::{ServerError, ServerResult};

// Configuration defaults
const DEFAULT_CONTRACT_ADDRESS: &str = "0xd887090fc6f9af10abe6cf287ac8011a3cb55a65";
const DEFAULT_OPENSEA_BASE_URL: &str = "https://api.opensea.io/api/v2";
const DEFAULT_MARKETPLACE_URL: &str = "https://opensea.io";
const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
const DEFAULT_MAX_BATCH_SIZE: usize = 50;
const MAX_PAGE_LIMIT: u32 = 200;

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe default port for development
    pub const fn default_development() -> Self {
        Self {
            port: 3000,
            environment: Environment::Development,
        }
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Checked against the environment once the whole configuration is loaded
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Create a timeout from a number of seconds known to be in range
    const fn from_secs_unchecked(seconds: u64) -> Self {
        Self(Duration::from_secs(seconds))
    }

    /// Create a safe default request timeout (120 seconds)
    ///
    /// A full batch with the default delay and size needs about half of that.
    pub const fn default_value() -> Self {
        Self::from_secs_unchecked(120)
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self::from_secs_unchecked(5)
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }

    /// Get the timeout value in whole seconds
    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

impl Default for TimeoutSeconds {
    fn default() -> Self {
        Self::default_value()
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Indexing API settings
#[derive(Debug, Clone, Deserialize)]
pub struct OpenSeaSettings {
    /// Base URL of the OpenSea v2 API
    pub base_url: String,
    /// API key sent with every request
    pub api_key: NonEmptyString,
    /// Marketplace root for synthesized token links
    pub marketplace_url: String,
    /// Tokens requested per account lookup
    pub page_limit: u32,
    /// Per-request timeout
    pub timeout_seconds: TimeoutSeconds,
}

impl OpenSeaSettings {
    /// Client configuration for `chain`
    pub fn client_config(&self, chain: ChainId) -> OpenSeaConfig {
        OpenSeaConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            marketplace_url: self.marketplace_url.clone(),
            chain,
            page_limit: self.page_limit,
            timeout_seconds: self.timeout_seconds.as_secs(),
        }
    }
}

/// Chain RPC settings
#[derive(Debug, Clone, Deserialize)]
pub struct RpcSettings {
    /// JSON-RPC endpoint
    pub url: String,
    /// Per-call timeout
    pub timeout_seconds: TimeoutSeconds,
    /// Retries after a failed `balanceOf` call
    pub max_retries: usize,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u64,
    /// Check the endpoint's chain ID before each batch
    pub verify_chain: bool,
}

impl RpcSettings {
    /// Client configuration
    pub fn client_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.url.clone(),
            timeout_seconds: self.timeout_seconds.as_secs(),
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

/// Batch pipeline settings
#[derive(Debug, Clone, Deserialize)]
pub struct CheckerSettings {
    /// Collection every wallet is checked against
    pub contract_address: Address,
    /// Chain the collection lives on
    pub chain: ChainId,
    /// Pause between consecutive addresses in milliseconds
    pub address_delay_ms: u64,
    /// Deadline for a single address
    pub address_timeout_seconds: TimeoutSeconds,
}

impl CheckerSettings {
    /// Timing settings for the batch runner
    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            address_delay: Duration::from_millis(self.address_delay_ms),
            address_timeout: self.address_timeout_seconds.value(),
        }
    }
}

/// Server configuration for different environments
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Request deadline in seconds (validated range: 1-300); a wallet check
    /// past it is cancelled and returns partial results
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Largest number of addresses accepted in one request
    pub max_batch_size: usize,
    /// Indexing API settings
    pub opensea: OpenSeaSettings,
    /// Chain RPC settings
    pub rpc: RpcSettings,
    /// Batch pipeline settings
    pub checker: CheckerSettings,
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        let config = Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })?;
        config.validate().map_err(|e| ServerError::Config {
            message: format!("invalid configuration: {e}"),
        })?;
        Ok(config)
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with the `SERVER__` prefix, nested keys joined by `__`
    ///    (e.g. `SERVER__OPENSEA__API_KEY`)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", TimeoutSeconds::default_value().as_secs())?
            .set_default("environment", "development")?
            .set_default("max_batch_size", DEFAULT_MAX_BATCH_SIZE as u64)?
            .set_default("opensea.base_url", DEFAULT_OPENSEA_BASE_URL)?
            .set_default("opensea.marketplace_url", DEFAULT_MARKETPLACE_URL)?
            .set_default("opensea.page_limit", 50)?
            .set_default("opensea.timeout_seconds", 10)?
            .set_default("rpc.url", DEFAULT_RPC_URL)?
            .set_default("rpc.timeout_seconds", 10)?
            .set_default("rpc.max_retries", 2)?
            .set_default("rpc.retry_delay_ms", 500)?
            .set_default("rpc.verify_chain", false)?
            .set_default("checker.contract_address", DEFAULT_CONTRACT_ADDRESS)?
            .set_default("checker.chain", ChainId::Ethereum.chain_id())?
            .set_default("checker.address_delay_ms", 500)?
            .set_default("checker.address_timeout_seconds", 60)?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }

        let config = config_builder.build()?;
        let mut server_config: Self = config.try_deserialize()?;

        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        Ok(server_config)
    }

    /// Check values that cannot be expressed through the field types
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_batch_size > 0, "max_batch_size must be greater than 0");
        ensure!(
            (1..=MAX_PAGE_LIMIT).contains(&self.opensea.page_limit),
            "opensea.page_limit must be between 1 and {MAX_PAGE_LIMIT}"
        );
        for (key, value) in [
            ("opensea.base_url", &self.opensea.base_url),
            ("opensea.marketplace_url", &self.opensea.marketplace_url),
            ("rpc.url", &self.rpc.url),
        ] {
            Url::parse(value).map_err(|e| anyhow!("{key} is not a valid URL: {e}"))?;
        }
        ensure!(
            self.checker.contract_address != Address::ZERO,
            "checker.contract_address cannot be the zero address"
        );
        Ok(())
    }

    /// Create configuration optimized for testing
    ///
    /// Providers point at unroutable local endpoints until a test overrides them.
    #[allow(clippy::missing_panics_doc)]
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(), // let OS choose available port
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            max_batch_size: 10,
            opensea: OpenSeaSettings {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: NonEmptyString::new("test-api-key").expect("known to be non-empty"),
                marketplace_url: DEFAULT_MARKETPLACE_URL.to_string(),
                page_limit: 50,
                timeout_seconds: TimeoutSeconds::from_secs_unchecked(2),
            },
            rpc: RpcSettings {
                url: "http://127.0.0.1:9".to_string(),
                timeout_seconds: TimeoutSeconds::from_secs_unchecked(2),
                max_retries: 2,
                retry_delay_ms: 10,
                verify_chain: false,
            },
            checker: CheckerSettings {
                contract_address: Address::from([0xc0; 20]),
                chain: ChainId::Ethereum,
                address_delay_ms: 0,
                address_timeout_seconds: TimeoutSeconds::from_secs_unchecked(4),
            },
        }
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}
