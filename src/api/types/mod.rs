//! API request and response types

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
