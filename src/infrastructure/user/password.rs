//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher with a configurable time cost
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher using `cost` iterations over the default memory size
    pub fn with_cost(cost: u32) -> Result<Self, DomainError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| DomainError::configuration(format!("Invalid password hash cost {}: {}", cost, e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters come from the stored hash, so older hashes keep verifying
        // after the configured cost changes.
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
