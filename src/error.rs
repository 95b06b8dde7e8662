//! Error types shared by the HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure of a single request. Nothing is retried; every variant is
/// terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input.
    #[error("{0}")]
    BadRequest(String),

    /// The session cookie is absent.
    #[error("Not authenticated")]
    Unauthenticated,

    /// GitHub answered with a non-success status.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// A value the handler needs was not configured.
    #[error("{0}")]
    Config(String),

    /// Calling GitHub failed or its body could not be decoded.
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Config(_) | ApiError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.without_url().to_string())
    }
}

/// Plain-text rendering, used by endpoints without a JSON error shape.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
