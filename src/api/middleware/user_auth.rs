//! User authentication middleware using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::{User, UserId};

/// Extractor that requires a valid JWT token
///
/// Extracts the JWT token from:
/// - Authorization header: `Bearer <jwt_token>`
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.jwt_service.validate(&token)?;

        let user_id = UserId::parse(claims.user_id()).ok_or_else(|| {
            debug!("Token subject is not a user ID");
            ApiError::unauthorized("Invalid token")
        })?;

        // Tokens outlive deleted accounts; treat those as unauthenticated
        let user = state
            .user_service
            .get(&user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        Ok(RequireUser(user))
    }
}

/// Extract JWT token from Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    token.map(str::to_string).ok_or_else(|| {
        ApiError::unauthorized(
            "Authentication required. Provide JWT token via 'Authorization: Bearer <token>' header",
        )
    })
}
