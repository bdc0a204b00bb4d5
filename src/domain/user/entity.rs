//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::normalize_email;

/// User identifier - a random UUID assigned at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse from the hyphenated string form
    pub fn parse(id: &str) -> Option<Self> {
        Uuid::parse_str(id).ok().map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Display name chosen at registration
    username: String,
    /// Normalized (trimmed, lowercased) email, unique across users
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id
    pub fn new(
        username: impl Into<String>,
        email: impl AsRef<str>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::generate(),
            username: username.into().trim().to_string(),
            email: normalize_email(email.as_ref()),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a user from stored fields
    pub fn from_parts(
        id: UserId,
        username: String,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
