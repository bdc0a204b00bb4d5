//! Contact form submission

use thiserror::Error;

/// Errors raised while accepting a contact form submission
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactValidationError {
    #[error("Please fill all required fields.")]
    MissingFields,
}

/// A validated contact form submission
///
/// All three fields are guaranteed non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    name: String,
    email: String,
    message: String,
}

impl ContactMessage {
    /// Accept a submission, rejecting any field that is absent or blank
    pub fn new(
        name: Option<&str>,
        email: Option<&str>,
        message: Option<&str>,
    ) -> Result<Self, ContactValidationError> {
        let (Some(name), Some(email), Some(message)) =
            (non_blank(name), non_blank(email), non_blank(message))
        else {
            return Err(ContactValidationError::MissingFields);
        };

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
