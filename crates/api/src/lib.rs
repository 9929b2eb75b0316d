// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! NFT Holder Checker Server
//!
//! This crate provides the HTTP server for the holder checker service, built with
//! Axum. It accepts batches of wallet addresses and reports, per address, whether
//! the wallet holds a token of the configured collection.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and HTTP response handling with proper status codes
//! - [`extractors`]: JSON body extraction with actionable error messages
//! - [`state`]: Shared application state and health reporting
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`docs`] and [`openapi`]: `OpenAPI` document and Swagger UI endpoints
//!
//! # Key Features
//!
//! - **Indexing API with chain fallback**: wallets are looked up through OpenSea;
//!   after its first failure a batch continues with `balanceOf` reads over JSON-RPC
//! - **Graceful Shutdown**: shutdown cancels in-flight batches through a child
//!   `CancellationToken`; partial results are returned with `cancelled: true`
//! - **Validated configuration**: bad values fail at startup, not on the first request

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use shared_types::ChainId;
pub use state::{HealthCheck, ServerState};
