//! User service for registration and login

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{
    normalize_email, validate_email, validate_password, validate_username, User, UserId,
    UserRepository, UserValidationError,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
///
/// Fields are optional so that absent and empty values fail the same way.
#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request for logging in
#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher + 'static> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user with a unique email
    pub async fn register(&self, request: RegisterRequest) -> Result<User, DomainError> {
        let username = request.username.unwrap_or_default();
        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        validate_username(&username).map_err(invalid)?;
        validate_email(&email).map_err(invalid)?;
        validate_password(&password).map_err(invalid)?;

        let email = normalize_email(&email);

        if self.repository.email_exists(&email).await? {
            debug!(email = %email, "Registration rejected for existing email");
            return Err(DomainError::conflict("Email already exists"));
        }

        let password_hash = self.hash(password).await?;

        // The repository re-checks uniqueness atomically; a concurrent
        // registration that wins the race turns this into a Conflict.
        let user = self
            .repository
            .create(User::new(username, email, password_hash))
            .await?;

        info!(user_id = %user.id(), "User registered");

        Ok(user)
    }

    /// Authenticate a user with email and password
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, DomainError> {
        let email = request
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| invalid(UserValidationError::EmptyEmail))?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| invalid(UserValidationError::EmptyPassword))?;

        let user = self
            .repository
            .get_by_email(&normalize_email(&email))
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        if !self.verify(password, user.password_hash().to_string()).await? {
            debug!(user_id = %user.id(), "Password mismatch");
            return Err(DomainError::invalid_credential("Invalid credentials"));
        }

        info!(user_id = %user.id(), "User logged in");

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    async fn hash(&self, password: String) -> Result<String, DomainError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool, DomainError> {
        let hasher = self.hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password verification task failed: {}", e)))
    }
}

fn invalid(error: UserValidationError) -> DomainError {
    DomainError::validation(error.to_string())
}
