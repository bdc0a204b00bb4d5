//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::User;
use crate::domain::DomainError;

/// Upper bound on configured token lifetime (ten years)
const MAX_EXPIRATION_HOURS: u64 = 24 * 365 * 10;

/// JWT claims structure
///
/// Registration and login issue the same claim set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create new claims for a user
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiration_hours.min(MAX_EXPIRATION_HOURS) as i64;
        let exp = now + Duration::hours(hours);

        Self {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    /// Configuration with a random secret; tokens do not survive a restart
    pub fn with_random_secret(expiration_hours: u64) -> Self {
        let secret: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();

        Self::new(secret, expiration_hours)
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a JWT token for a user
    fn generate(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a JWT token and return the claims
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    /// Get the token expiration time in hours
    fn expiration_hours(&self) -> u64;
}

/// JWT service implementation using a shared HS256 secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<String, DomainError> {
        let claims = JwtClaims::new(user, self.config.expiration_hours);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new("alice", "a@x.com", "hashed_password")
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345", 24))
    }

    #[test]
    fn test_generate_and_validate() {
        let service = create_service();
        let user = create_test_user();

        let token = service.generate(&user).unwrap();
        assert!(!token.is_empty());

        let claims = service.validate(&token).unwrap();
        assert_eq!(claims.sub, user.id().to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expiry_is_one_day_by_default() {
        let claims = JwtClaims::new(&create_test_user(), 24);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let result = service.validate("invalid.token.here");
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1", 24));
        let service2 = JwtService::new(JwtConfig::new("secret-2", 24));

        let token = service1.generate(&create_test_user()).unwrap();

        assert!(service2.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_service();
        let user = create_test_user();

        let mut claims = JwtClaims::new(&user, 24);
        claims.iat -= 7200;
        claims.exp = Utc::now().timestamp() - 3600;

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-12345"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_random_secret_differs() {
        let a = JwtConfig::with_random_secret(24);
        let b = JwtConfig::with_random_secret(24);

        assert_eq!(a.secret.len(), 64);
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = create_service();
        let debug = format!("{:?}", service);

        assert!(!debug.contains("test-secret-key-12345"));
        assert!(debug.contains("[hidden]"));
    }
}
