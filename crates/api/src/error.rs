// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! This module provides error types for server operations, including the
//! mapping of each error onto an HTTP status code and JSON body.

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Input validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// JSON parsing errors with detailed context
    #[error("Invalid JSON request: {message}")]
    JsonError {
        /// Detailed error message
        message: String,
    },

    /// The server is draining and no longer accepts work
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message
        message: String,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Config { .. }
            | ServerError::Bind { .. }
            | ServerError::Startup { .. }
            | ServerError::Shutdown { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::ValidationError(..) | ServerError::JsonError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServerError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}
