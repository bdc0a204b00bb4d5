//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

const SERVER_ERROR_MESSAGE: &str = "Server error";
const DELIVERY_ERROR_MESSAGE: &str = "Failed to send email.";

/// Machine-readable error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationError,
    DuplicateCredential,
    NotFound,
    InvalidCredential,
    Unauthorized,
    ServiceError,
    DeliveryError,
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationError => write!(f, "validation_error"),
            Self::DuplicateCredential => write!(f, "duplicate_credential"),
            Self::NotFound => write!(f, "not_found"),
            Self::InvalidCredential => write!(f, "invalid_credential"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::ServiceError => write!(f, "service_error"),
            Self::DeliveryError => write!(f, "delivery_error"),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub msg: String,
    pub code: ApiErrorCode,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: ApiErrorCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                msg: msg.into(),
                code,
            },
        }
    }

    /// Bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::ValidationError, msg)
    }

    /// Authentication error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorCode::Unauthorized, msg)
    }

    /// Not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, msg)
    }

    /// Internal server error with a fixed message
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::ServiceError,
            SERVER_ERROR_MESSAGE,
        )
    }

    /// Mail delivery failure with a fixed message
    pub fn delivery() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::DeliveryError,
            DELIVERY_ERROR_MESSAGE,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => {
                Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::DuplicateCredential, message)
            }
            DomainError::InvalidCredential { message } => {
                Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::InvalidCredential, message)
            }
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Unauthorized { message } => {
                tracing::debug!(reason = %message, "Request unauthorized");
                Self::unauthorized("Unauthorized")
            }
            DomainError::Delivery { message } => {
                tracing::error!(error = %message, "Email delivery failed");
                Self::delivery()
            }
            err @ (DomainError::Storage { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. }) => {
                tracing::error!(error = %err, "Request failed");
                Self::internal()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.code, self.response.msg)
    }
}

impl std::error::Error for ApiError {}
