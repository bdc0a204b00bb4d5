//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must enforce email uniqueness on `create` and report a
/// duplicate as `DomainError::Conflict`.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their normalized email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Count stored users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
