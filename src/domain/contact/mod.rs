//! Contact form domain
//!
//! Validation of contact submissions and rendering of the operator
//! notification email.

mod email;
mod message;
mod template;

pub use email::{ContactEmail, LOGO_CONTENT_ID};
pub use message::{ContactMessage, ContactValidationError};
pub use template::{escape_html, HtmlTemplate, TemplateError};
