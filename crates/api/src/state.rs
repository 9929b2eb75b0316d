// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the holder checker server,
//! including configuration, the batch runner, and coordinated cancellation.

use std::sync::Arc;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use shared_types::ChainId;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use wallet_checker::{BatchRunner, DefaultProviderFactory};

use crate::config::{Environment, ServerConfig};

/// Batch runner used by the HTTP handlers
pub type Checker = BatchRunner<DefaultProviderFactory>;

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Wallet check pipeline
    checker: Arc<Checker>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `checker` - Batch runner shared by all requests
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        checker: Arc<Checker>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            checker,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Batch runner for wallet checks
    pub fn checker(&self) -> &Arc<Checker> {
        &self.checker
    }

    /// Report service status
    ///
    /// Providers are not probed; they are only contacted while a batch runs.
    pub fn health_check(&self) -> HealthCheck {
        let status = if self.cancellation_token.is_cancelled() {
            HealthStatus::Draining
        } else {
            HealthStatus::Up
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            contract_address: self.config.checker.contract_address,
            chain: self.config.checker.chain,
        }
    }
}

/// Health status of the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Accepting wallet checks
    Up,
    /// Shutting down; new batches are refused
    Draining,
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    #[schema(value_type = String)]
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Collection wallets are checked against
    #[schema(value_type = String, example = "0xd887090fc6f9af10abe6cf287ac8011a3cb55a65")]
    pub contract_address: Address,
    /// Chain of the collection
    #[schema(value_type = u64, example = 1)]
    pub chain: ChainId,
}
