//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const PRIMARY_KEY_CONSTRAINT: &str = "users_pkey";

/// PostgreSQL implementation of UserRepository
///
/// Email uniqueness is enforced by the `users_email_key` constraint, so
/// concurrent registrations for the same address cannot both succeed.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, user.id()))?;

        Ok(user)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn insert_error(e: sqlx::Error, id: &UserId) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            match db.constraint() {
                Some(EMAIL_CONSTRAINT) => return DomainError::conflict("Email already exists"),
                Some(PRIMARY_KEY_CONSTRAINT) => {
                    return DomainError::conflict(format!("User with ID '{}' already exists", id));
                }
                _ => {}
            }
        }
    }

    DomainError::storage(format!("Failed to create user: {}", e))
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let decode = |e: sqlx::Error| DomainError::storage(format!("Failed to decode user row: {}", e));

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let username: String = row.try_get("username").map_err(decode)?;
    let email: String = row.try_get("email").map_err(decode)?;
    let password_hash: String = row.try_get("password_hash").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(User::from_parts(
        UserId::from_uuid(id),
        username,
        email,
        password_hash,
        created_at,
    ))
}
