//! Contact form endpoint

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DomainError;
use crate::infrastructure::contact::ContactRequest;
use crate::infrastructure::observability::record_contact_email;

/// Create the contact router
pub fn create_contact_router() -> Router<AppState> {
    Router::new().route("/send-contact-email", post(send_contact_email))
}

/// Contact form body
#[derive(Debug, Deserialize)]
pub struct ContactFormRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactFormResponse {
    pub message: String,
}

/// Relay a contact form submission to the operator inbox
///
/// POST /send-contact-email
pub async fn send_contact_email(
    State(state): State<AppState>,
    Json(request): Json<ContactFormRequest>,
) -> Result<Json<ContactFormResponse>, ApiError> {
    let result = state
        .contact_service
        .send(ContactRequest {
            name: request.name,
            email: request.email,
            message: request.message,
        })
        .await;

    // Only submissions that reached the transport count as delivery attempts
    if !matches!(result, Err(DomainError::Validation { .. })) {
        record_contact_email(result.is_ok());
    }
    result?;

    Ok(Json(ContactFormResponse {
        message: "Email sent successfully.".to_string(),
    }))
}
