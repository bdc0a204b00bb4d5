//! In-memory transport that records outgoing messages

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::mail::{MailTransport, OutgoingEmail};
use crate::domain::DomainError;

/// Records every message it is asked to send
#[derive(Debug, Default, Clone)]
pub struct RecordingMailTransport {
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl RecordingMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether sends should fail with a delivery error
    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    /// Messages delivered so far, oldest first
    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailTransport {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::delivery("Recording transport configured to fail"));
        }

        self.sent.write().await.push(email);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
