//! Outbound mail transports

mod disabled;
#[cfg(test)]
mod recording;
mod smtp;

pub use disabled::DisabledMailTransport;
#[cfg(test)]
pub use recording::RecordingMailTransport;
pub use smtp::{SmtpMailTransport, SmtpSettings};

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::MailConfig;
use crate::domain::mail::MailTransport;
use crate::domain::DomainError;

/// Create the mail transport described by the configuration
///
/// Without a relay account the disabled transport is returned and every
/// contact submission fails with a delivery error.
pub fn create_mail_transport(config: &MailConfig) -> Result<Arc<dyn MailTransport>, DomainError> {
    let Some(username) = config.username.clone() else {
        warn!("Mail relay account not configured; contact emails will fail");
        return Ok(Arc::new(DisabledMailTransport));
    };

    let transport = SmtpMailTransport::new(SmtpSettings {
        host: config.smtp_host.clone(),
        username,
        password: config.password.clone().unwrap_or_default(),
        from_name: config.from_name.clone(),
    })?;

    info!(host = %config.smtp_host, "SMTP mail transport configured");

    Ok(Arc::new(transport))
}
