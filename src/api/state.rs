//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::contact::{ContactRequest, ContactService};
use crate::infrastructure::user::{LoginRequest, PasswordHasher, RegisterRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub jwt_service: Arc<dyn JwtGenerator>,
    pub contact_service: Arc<dyn ContactServiceTrait>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        jwt_service: Arc<dyn JwtGenerator>,
        contact_service: Arc<dyn ContactServiceTrait>,
    ) -> Self {
        Self {
            user_service,
            jwt_service,
            contact_service,
        }
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError>;
    async fn authenticate(&self, request: LoginRequest) -> Result<User, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Trait for contact form relay
#[async_trait::async_trait]
pub trait ContactServiceTrait: Send + Sync {
    async fn send(&self, request: ContactRequest) -> Result<(), DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static, H: PasswordHasher + 'static> UserServiceTrait
    for UserService<R, H>
{
    async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn authenticate(&self, request: LoginRequest) -> Result<User, DomainError> {
        UserService::authenticate(self, request).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }
}

#[async_trait::async_trait]
impl ContactServiceTrait for ContactService {
    async fn send(&self, request: ContactRequest) -> Result<(), DomainError> {
        ContactService::send(self, request).await
    }
}
