//! API error handling
//!
//! Maps the engine's error taxonomy onto HTTP. Every response body carries
//! the stable machine-readable kind alongside the human-readable message,
//! and retryable contention advertises `Retry-After`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use swapguard_types::EscrowError;
use thiserror::Error;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine rejection, mapped per kind
    #[error(transparent)]
    Escrow(#[from] EscrowError),

    /// Request body or path failed to parse
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Escrow(err) => err.kind(),
            Self::InvalidParameter(_) => "VALIDATION_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::Escrow(err) => match err {
                EscrowError::Validation { .. } => StatusCode::BAD_REQUEST,
                EscrowError::NotFound { .. } => StatusCode::NOT_FOUND,
                EscrowError::UnauthorizedActor { .. } => StatusCode::FORBIDDEN,
                EscrowError::InvalidTransition { .. } => StatusCode::CONFLICT,
                EscrowError::LockedLedger { .. } => StatusCode::LOCKED,
                EscrowError::ClosedLedger { .. } => StatusCode::GONE,
                EscrowError::Contention { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false on the error path; mirrors the success envelope
    pub success: bool,
    /// Human-readable message
    pub error: String,
    /// Stable machine-readable kind
    pub kind: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);

        let mut response = (status, Json(body)).into_response();

        // Contention is the one caller-retryable condition
        if let ApiError::Escrow(EscrowError::Contention { .. }) = &self {
            if let Ok(value) = "1".parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}
