//! Domain layer - Core business logic and entities

pub mod contact;
pub mod error;
pub mod mail;
pub mod user;

pub use contact::{ContactEmail, ContactMessage, ContactValidationError};
pub use error::DomainError;
pub use mail::{InlineImage, MailTransport, MailboxAddress, OutgoingEmail};
pub use user::{User, UserId, UserRepository, UserValidationError};
