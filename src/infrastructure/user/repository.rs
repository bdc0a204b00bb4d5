//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    /// Normalized email -> user ID
    email_index: HashMap<String, UserId>,
}

/// In-memory implementation of UserRepository
///
/// Both maps live behind one lock so the uniqueness check and the insert
/// happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.email_index.contains_key(user.email()) {
            return Err(DomainError::conflict("Email already exists"));
        }

        if table.users.contains_key(user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        table.email_index.insert(user.email().to_string(), *user.id());
        table.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.users.len())
    }
}
