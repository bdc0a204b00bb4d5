//! Transport used when no relay account is configured

use async_trait::async_trait;
use tracing::warn;

use crate::domain::mail::{MailTransport, OutgoingEmail};
use crate::domain::DomainError;

/// Rejects every message with a delivery error
#[derive(Debug, Default, Clone)]
pub struct DisabledMailTransport;

#[async_trait]
impl MailTransport for DisabledMailTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        warn!(subject = %email.subject, "Mail relay is not configured, dropping message");
        Err(DomainError::delivery("Mail relay is not configured"))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
