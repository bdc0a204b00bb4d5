//! Authentication API endpoints
//!
//! Registration, login and current-user lookup for JWT-based authentication.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::observability::record_auth_event;
use crate::infrastructure::user;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token issued on register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
    pub email: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Register a new account
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let result = state
        .user_service
        .register(user::RegisterRequest {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await;
    record_auth_event("register", result.is_ok());

    let response = issue_token(&state, &result?)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let result = state
        .user_service
        .authenticate(user::LoginRequest {
            email: request.email,
            password: request.password,
        })
        .await;
    record_auth_event("login", result.is_ok());

    Ok(Json(issue_token(&state, &result?)?))
}

/// Get current authenticated user
///
/// GET /api/me
pub async fn get_current_user(RequireUser(user): RequireUser) -> Json<UserResponse> {
    Json(UserResponse::from_user(&user))
}

fn issue_token(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let token = state.jwt_service.generate(user)?;

    Ok(AuthResponse {
        token,
        username: user.username().to_string(),
        email: user.email().to_string(),
    })
}
