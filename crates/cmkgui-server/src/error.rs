//! Error types for the server crate.

use crate::pages;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use cmkgui_token::TokenError;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to start the server.
    #[error("failed to start server: {0}")]
    StartupFailed(String),

    /// No token, malformed token or unknown token.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The token was valid once but the share is no longer available.
    #[error("no longer available: {0}")]
    Gone(String),

    /// Token store failure (IO, lock timeout, corrupt file).
    #[error("token store error: {0}")]
    TokenStore(#[from] TokenError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                Html(pages::unauthenticated_page()),
            )
                .into_response(),
            ServerError::Gone(reason) => {
                (StatusCode::GONE, Html(pages::gone_page(&reason))).into_response()
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
