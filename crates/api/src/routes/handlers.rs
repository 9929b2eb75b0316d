// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides HTTP request handlers for the holder checker server,
//! including the health check and the cancellation-aware wallet check endpoint.

use alloy_primitives::Address;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use wallet_checker::{AddressCheckResult, AddressFilter, BatchSummary, filter_addresses};

use crate::{
    error::ServerError,
    extractors::JsonExtractor,
    state::{HealthCheck, HealthStatus, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the service status, version, environment and the collection wallets are checked against. Reports Draining with 503 once shutdown has started.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
        (status = 503, description = "Service is shutting down", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> impl IntoResponse {
    let health = state.health_check();
    let status = match health.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Draining => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(health))
}

/// Wallet check request
///
/// Addresses are taken as given: duplicates and malformed entries are allowed
/// and each one gets its own result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckWalletsRequest {
    /// Wallet addresses to check (must not be empty)
    #[schema(example = json!(["0xd887090fc6f9af10abe6cf287ac8011a3cb55a65"]))]
    pub addresses: Vec<String>,
    /// Selection reported in `filteredAddresses`
    #[serde(default)]
    pub filter: AddressFilter,
}

impl CheckWalletsRequest {
    /// Validates the address count against `max_batch_size`
    pub fn validate(&self, max_batch_size: usize) -> Result<(), String> {
        if self.addresses.is_empty() {
            return Err("addresses list cannot be empty".to_string());
        }
        if self.addresses.len() > max_batch_size {
            return Err(format!(
                "too many addresses: {} (max: {max_batch_size})",
                self.addresses.len()
            ));
        }
        Ok(())
    }
}

/// Wallet check response
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckWalletsResponse {
    /// Collection the wallets were checked against
    #[schema(value_type = String, example = "0xd887090fc6f9af10abe6cf287ac8011a3cb55a65")]
    pub contract_address: Address,
    /// One result per input address, in input order
    pub results: Vec<AddressCheckResult>,
    /// Counts over `results`
    pub summary: BatchSummary,
    /// Addresses selected by the request's filter, failures excluded
    pub filtered_addresses: Vec<String>,
    /// Whether shutdown or the request deadline stopped the batch before every
    /// address was checked
    pub cancelled: bool,
}

/// Wallet check
///
/// Checks each address against the configured collection, one at a time. The
/// indexing API is tried first; after its first failure the rest of the batch
/// is read from the chain. When `timeout_seconds` elapses the batch is cancelled
/// and the addresses checked so far are returned with `cancelled` set.
///
/// # Errors
///
/// Returns `ServerError` if the request is invalid or the server is shutting down.
/// Provider failures never fail the request; they are reported per address.
#[utoipa::path(
    post,
    path = "/v1/wallets/check",
    tag = "wallets",
    summary = "Check wallets for collection ownership",
    description = "Checks an ordered list of wallet addresses for ownership of the configured NFT collection. Returns one result per address in input order, with a summary and the addresses selected by the optional filter.",
    request_body = CheckWalletsRequest,
    responses(
        (status = 200, description = "Batch completed or stopped early; see `cancelled`", body = CheckWalletsResponse),
        (status = 400, description = "Invalid request - empty or oversized address list, or malformed JSON", body = String),
        (status = 503, description = "Server is shutting down", body = String)
    )
)]
pub async fn check_wallets_handler(
    State(state): State<ServerState>,
    JsonExtractor(request): JsonExtractor<CheckWalletsRequest>,
) -> Result<Json<CheckWalletsResponse>, ServerError> {
    request
        .validate(state.config().max_batch_size)
        .map_err(ServerError::ValidationError)?;

    if state.cancellation_token.is_cancelled() {
        return Err(ServerError::ServiceUnavailable {
            message: "server is shutting down".to_string(),
        });
    }

    let contract_address = state.config().checker.contract_address;
    let cancel = state.cancellation_token.child_token();

    info!(
        addresses = request.addresses.len(),
        contract = %contract_address,
        "wallet check started"
    );

    let deadline = state.config().timeout_seconds;
    let batch = state.checker().check_addresses_with_progress(
        &request.addresses,
        contract_address,
        &cancel,
        |progress| {
            debug!(
                completed = progress.completed,
                total = progress.total,
                "wallet check progress"
            );
        },
    );
    tokio::pin!(batch);

    let report = tokio::select! {
        report = &mut batch => report,
        () = tokio::time::sleep(deadline.value()) => {
            warn!(
                timeout_seconds = deadline.as_secs(),
                "request deadline reached, cancelling batch"
            );
            cancel.cancel();
            batch.await
        }
    };

    let summary = report.summary();
    let filtered_addresses = filter_addresses(&report.results, request.filter)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(CheckWalletsResponse {
        contract_address,
        results: report.results,
        summary,
        filtered_addresses,
        cancelled: report.cancelled,
    }))
}
