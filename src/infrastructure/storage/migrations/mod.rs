//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, strictly increasing
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
    /// SQL to run when reverting the migration
    pub down: String,
}

impl Migration {
    pub fn new(
        version: i64,
        description: impl Into<String>,
        up: impl Into<String>,
        down: impl Into<String>,
    ) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
            down: down.into(),
        }
    }
}

/// PostgreSQL migrator that tracks applied versions in `_migrations`
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row, so a failed migration leaves no record behind.
#[derive(Debug, Clone)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Apply every migration not yet recorded, returning the versions applied
    pub async fn run(&self, migrations: &[Migration]) -> Result<Vec<i64>, DomainError> {
        let applied = self.applied_versions().await?;
        let mut newly_applied = Vec::new();

        for migration in migrations.iter().filter(|m| !applied.contains(&m.version)) {
            let mut tx = self.pool.begin().await.map_err(tx_error)?;

            sqlx::raw_sql(&migration.up)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to run migration {}: {}",
                        migration.version, e
                    ))
                })?;

            sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
                .bind(migration.version)
                .bind(&migration.description)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to record migration {}: {}",
                        migration.version, e
                    ))
                })?;

            tx.commit().await.map_err(tx_error)?;

            info!(version = migration.version, description = %migration.description, "Applied migration");
            newly_applied.push(migration.version);
        }

        Ok(newly_applied)
    }

    /// Revert the most recently applied migration, if any
    pub async fn revert_last(&self, migrations: &[Migration]) -> Result<Option<i64>, DomainError> {
        let Some(version) = self.current_version().await? else {
            return Ok(None);
        };

        let migration = migrations
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| {
                DomainError::storage(format!("Applied migration {} is unknown", version))
            })?;

        let mut tx = self.pool.begin().await.map_err(tx_error)?;

        sqlx::raw_sql(&migration.down)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to revert migration {}: {}", version, e))
            })?;

        sqlx::query("DELETE FROM _migrations WHERE version = $1")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to remove migration record {}: {}",
                    version, e
                ))
            })?;

        tx.commit().await.map_err(tx_error)?;

        info!(version, "Reverted migration");

        Ok(Some(version))
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        Ok(self.applied_versions().await?.last().copied())
    }

    /// Returns all applied migration versions in ascending order
    pub async fn applied_versions(&self) -> Result<Vec<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get applied migrations: {}", e)))
    }
}

fn tx_error(e: sqlx::Error) -> DomainError {
    DomainError::storage(format!("Migration transaction failed: {}", e))
}

/// Schema migrations for the user store
pub fn user_migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "Create users table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username VARCHAR(50) NOT NULL,
            email VARCHAR(254) NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_key UNIQUE (email)
        );
        "#,
        r#"
        DROP TABLE IF EXISTS users;
        "#,
    )]
}

/// Runs all pending user store migrations
pub async fn run_migrations(pool: &PgPool) -> Result<Vec<i64>, DomainError> {
    PostgresMigrator::new(pool.clone())
        .run(&user_migrations())
        .await
}
