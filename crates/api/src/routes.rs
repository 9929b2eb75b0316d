// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the holder checker server.

pub mod handlers;

use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{check_wallets_handler, health_handler};
use tower_http::timeout::TimeoutLayer;

use crate::{
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes
///
/// `timeout` bounds the health and docs routes. The wallet check enforces the
/// same deadline itself so an expired batch still answers with its partial results.
pub fn create_routes(timeout: Duration) -> Router<ServerState> {
    let health_routes = Router::new().route("/health", get(health_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let bounded = Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .layer(TimeoutLayer::new(timeout));

    let api_routes = Router::new().route("/wallets/check", post(check_wallets_handler));

    let v1 = Router::new().nest("/v1", api_routes);

    Router::new().merge(bounded).merge(v1)
}
