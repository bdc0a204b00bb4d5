//! Virtua Mod backend
//!
//! A small HTTP service providing:
//! - Account registration and login with signed session tokens
//! - A contact form relayed to the operator inbox over SMTP
//! - Health probes, Prometheus metrics and static assets

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::PathBuf;
use std::sync::Arc;

use api::state::{AppState, ContactServiceTrait, UserServiceTrait};
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::contact::ContactService;
use infrastructure::mail::create_mail_transport;
use infrastructure::storage::{run_migrations, PostgresConfig};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};
use tracing::{info, warn};

/// Create the application state with all services initialized
///
/// With a database URL configured, users live in PostgreSQL and pending
/// migrations are applied first; otherwise they are kept in memory.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::with_cost(config.auth.hash_cost)?);

    let user_service: Arc<dyn UserServiceTrait> =
        match PostgresConfig::from_app_config(&config.database) {
            Some(pg_config) => {
                info!("Using PostgreSQL user store");
                let pool = pg_config.connect().await?;
                let applied = run_migrations(&pool).await?;
                if !applied.is_empty() {
                    info!(versions = ?applied, "Applied pending migrations");
                }
                Arc::new(UserService::new(
                    Arc::new(PostgresUserRepository::new(pool)),
                    hasher,
                ))
            }
            None => {
                warn!("No database configured; users are kept in memory and lost on restart");
                Arc::new(UserService::new(
                    Arc::new(InMemoryUserRepository::new()),
                    hasher,
                ))
            }
        };

    let expiration_hours = config.auth.token_expiration_hours;
    let jwt_config = match &config.auth.jwt_secret {
        Some(secret) => JwtConfig::new(secret.clone(), expiration_hours),
        None => {
            warn!("JWT secret not configured; using a random secret, tokens will not survive a restart");
            JwtConfig::with_random_secret(expiration_hours)
        }
    };
    let jwt_service = Arc::new(JwtService::new(jwt_config));

    let contact_service: Arc<dyn ContactServiceTrait> = Arc::new(ContactService::new(
        create_mail_transport(&config.mail)?,
        config.mail.operator_inbox().map(str::to_string),
        config.mail.logo_path.as_ref().map(PathBuf::from),
    ));

    Ok(AppState::new(user_service, jwt_service, contact_service))
}
