//! User domain
//!
//! This module provides domain types and traits for user accounts,
//! including the user entity, input validation, and the repository trait.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_password, validate_username, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
