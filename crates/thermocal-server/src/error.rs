//! Server error types and their HTTP rendering.

use std::io;

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thermocal_core::TracingError;
use thiserror::Error;
use tracing::{error, warn};

use crate::routes::CONNECT_PATH;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The OAuth client configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The provider rejected an authorization code, or the user denied consent.
    #[error("authorization failed: {message}")]
    AuthExchange { message: String },

    /// Listing events from the provider failed.
    #[error("calendar retrieval failed: {message}")]
    Retrieval { message: String },

    /// No credential is cached and no code was supplied.
    #[error("calendar not connected, visit /calendar/connect")]
    NotAuthorized,

    /// IO error (bind, accept).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Tracing could not be initialized.
    #[error("tracing setup failed: {0}")]
    Tracing(#[from] TracingError),
}

impl ServerError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an authorization code exchange error.
    pub fn auth_exchange(message: impl Into<String>) -> Self {
        Self::AuthExchange {
            message: message.into(),
        }
    }

    /// Creates a retrieval error.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    /// The HTTP status this error is surfaced with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthExchange { .. } | Self::NotAuthorized => StatusCode::UNAUTHORIZED,
            Self::Configuration { .. } | Self::Retrieval { .. } | Self::Io(_) | Self::Tracing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        match self {
            Self::NotAuthorized => (status, [(header::LOCATION, CONNECT_PATH)], body).into_response(),
            _ => (status, body).into_response(),
        }
    }
}
