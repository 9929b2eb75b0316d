// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition

use api_client::AssetSummary;
use utoipa::OpenApi;
use wallet_checker::{AddressCheckResult, AddressFilter, BatchSummary, ResultSource};

use crate::{
    config::Environment,
    routes::handlers::{self, CheckWalletsRequest, CheckWalletsResponse},
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` document for the holder checker API
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "NFT Holder Checker API",
        description = "Checks wallet addresses for ownership of an NFT collection, using an indexing API with an on-chain fallback."
    ),
    paths(handlers::health_handler, handlers::check_wallets_handler),
    components(schemas(
        AddressCheckResult,
        AddressFilter,
        AssetSummary,
        BatchSummary,
        CheckWalletsRequest,
        CheckWalletsResponse,
        Environment,
        HealthCheck,
        HealthStatus,
        ResultSource
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "wallets", description = "Collection ownership checks")
    )
)]
pub struct ApiDoc;
