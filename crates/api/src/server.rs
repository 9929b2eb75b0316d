// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server implementation module
//!
//! This module provides the main server struct for the holder checker service,
//! including lifecycle management, router configuration, and coordinated graceful
//! shutdown using `CancellationToken`. In-flight batches observe the same token
//! and stop between addresses once shutdown starts.

use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, http::HeaderName};
use hyper::Request;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn};
use wallet_checker::{BatchRunner, DefaultProviderFactory};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    routes::create_routes,
    state::{Checker, ServerState},
};

// Server constants
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for server shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Maximum time to wait for open connections after cancellation before giving up
    pub graceful_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout: Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS),
        }
    }
}

/// Main server struct
#[derive(Debug)]
pub struct Server {
    /// Server configuration
    config: ServerConfig,
    /// Application router
    router: Router,
    /// Server state
    state: ServerState,
    /// Cancellation token for coordinated shutdown
    cancellation_token: CancellationToken,
    /// Configuration for coordinated shutdown
    shutdown_config: ShutdownConfig,
}

impl Server {
    /// Create new server instance with providers built from `config`
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the configuration is invalid.
    pub fn new(config: ServerConfig, shutdown_config: ShutdownConfig) -> ServerResult<Self> {
        config.validate().map_err(|e| ServerError::Config {
            message: format!("invalid configuration: {e}"),
        })?;

        let factory = DefaultProviderFactory::new(
            config.opensea.client_config(config.checker.chain),
            config.rpc.client_config(),
        )
        .with_chain_verification(config.rpc.verify_chain);
        let checker = BatchRunner::new(factory, config.checker.batch_settings());

        Ok(Self::with_checker(config, shutdown_config, Arc::new(checker)))
    }

    /// Create server with a prepared batch runner
    pub fn with_checker(
        config: ServerConfig,
        shutdown_config: ShutdownConfig,
        checker: Arc<Checker>,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let state = ServerState::new(config.clone(), checker, cancellation_token.child_token());
        let router = Self::create_router(state.clone());

        Self {
            config,
            router,
            state,
            cancellation_token,
            shutdown_config,
        }
    }

    /// Create application router with middleware
    fn create_router(state: ServerState) -> Router {
        let timeout_duration = state.config().timeout_seconds.value();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                    if let Some(request_id) = req.headers().get(REQUEST_ID_HEADER) {
                        info_span!("http_request", ?request_id, method = %req.method(), uri = %req.uri())
                    } else {
                        error!("failed to extract id from request");
                        info_span!("http_request", request_id = "unknown", method = %req.method(), uri = %req.uri())
                    }
                }),
            )
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(CorsLayer::permissive());

        create_routes(timeout_duration).layer(middleware).with_state(state)
    }

    async fn bind(&self) -> ServerResult<(TcpListener, SocketAddr)> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr,
                source,
            })?;

        let actual_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;

        Ok((listener, actual_addr))
    }

    /// Run the server with coordinated graceful shutdown
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address,
    /// or `ServerError::Startup` if the server fails to start.
    pub async fn run(self) -> ServerResult<()> {
        let (listener, actual_addr) = self.bind().await?;

        info!(
            address = %actual_addr,
            environment = %self.config.environment,
            contract = %self.config.checker.contract_address,
            chain = %self.config.checker.chain,
            "holder checker server starting",
        );

        let cancellation_token = self.cancellation_token.clone();
        let shutdown_token = cancellation_token.clone();
        tokio::spawn(async move {
            Self::shutdown_signal_handler(shutdown_token).await;
        });

        let graceful_timeout = self.shutdown_config.graceful_timeout;
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                cancellation_token.cancelled().await;
                info!("stopped accepting connections, draining in-flight requests");
            })
            .into_future();

        let drain_token = self.cancellation_token.clone();
        let server_result = tokio::select! {
            result = serve => result,
            () = async {
                drain_token.cancelled().await;
                tokio::time::sleep(graceful_timeout).await;
            } => {
                warn!(
                    timeout_seconds = graceful_timeout.as_secs(),
                    "graceful shutdown timed out, dropping open connections"
                );
                Ok(())
            }
        };

        match server_result {
            Ok(()) => {
                info!("holder checker server shut down");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "server error during shutdown");
                Err(ServerError::Shutdown { source: e })
            }
        }
    }

    /// Handle shutdown signals and trigger coordinated cancellation
    ///
    /// Listens for SIGINT (Ctrl+C) and SIGTERM and cancels `cancellation_token`
    /// when either arrives.
    async fn shutdown_signal_handler(cancellation_token: CancellationToken) {
        let signal_received = async {
            #[cfg(unix)]
            #[allow(clippy::expect_used)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm =
                    signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
                let mut sigint =
                    signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigint.recv() => "SIGINT",
                }
            }

            #[cfg(not(unix))]
            #[allow(clippy::expect_used)]
            {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install CTRL+C signal handler");
                "CTRL+C"
            }
        };

        tokio::select! {
            signal_name = signal_received => {
                warn!(signal = signal_name, "shutdown signal received, cancelling in-flight batches");
                cancellation_token.cancel();
            },
            () = cancellation_token.cancelled() => {}
        }
    }

    /// Returns a clone of the cancellation token for coordinated shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Initiates graceful shutdown by cancelling the server's cancellation token
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation_token.cancel();
    }

    /// Run server for testing, returns the bound address
    ///
    /// Cancelling the returned token drains the server and cancels running
    /// batches, the same as a shutdown signal would.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let (listener, actual_addr) = self.bind().await?;

        let token = self.cancellation_token.clone();
        let task = token.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, self.router)
                .with_graceful_shutdown(async move { task.cancelled().await })
                .await;
        });

        Ok((actual_addr, token))
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server state
    pub fn state(&self) -> &ServerState {
        &self.state
    }
}
