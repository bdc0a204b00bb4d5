//! PostgreSQL connection pooling

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// PostgreSQL pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }

    /// Pool settings from the application config, if a database is configured
    pub fn from_app_config(config: &DatabaseConfig) -> Option<Self> {
        config.url.as_ref().map(|url| {
            Self::new(url.clone())
                .with_max_connections(config.max_connections)
                .with_connect_timeout(config.connect_timeout_secs)
        })
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Open a connection pool
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        info!(max_connections = self.max_connections, "PostgreSQL pool connected");

        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_app_config() {
        let config = DatabaseConfig {
            url: Some("postgres://localhost/virtua".to_string()),
            max_connections: 4,
            connect_timeout_secs: 5,
        };

        let pg = PostgresConfig::from_app_config(&config).unwrap();
        assert_eq!(pg.url, "postgres://localhost/virtua");
        assert_eq!(pg.max_connections, 4);
        assert_eq!(pg.connect_timeout_secs, 5);
    }

    #[test]
    fn test_no_url_means_no_database() {
        assert!(PostgresConfig::from_app_config(&DatabaseConfig::default()).is_none());
    }
}
