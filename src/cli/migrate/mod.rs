//! Migrate command - manages the PostgreSQL schema

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::infrastructure::storage::{user_migrations, PostgresConfig, PostgresMigrator};

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration
    #[arg(long, conflicts_with = "status")]
    pub revert: bool,

    /// Print applied versions without changing anything
    #[arg(long)]
    pub status: bool,
}

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let pg_config = PostgresConfig::from_app_config(&config.database)
        .context("database.url (or DATABASE_URL) must be set to run migrations")?;
    let pool = pg_config.connect().await?;

    let migrator = PostgresMigrator::new(pool);
    let migrations = user_migrations();

    if args.status {
        let applied = migrator.applied_versions().await?;
        let pending: Vec<i64> = migrations
            .iter()
            .map(|m| m.version)
            .filter(|v| !applied.contains(v))
            .collect();

        info!(applied = ?applied, pending = ?pending, "Migration status");
        return Ok(());
    }

    if args.revert {
        match migrator.revert_last(&migrations).await? {
            Some(version) => info!(version, "Migration reverted"),
            None => info!("No migrations to revert"),
        }
        return Ok(());
    }

    let applied = migrator.run(&migrations).await?;
    if applied.is_empty() {
        info!("Schema is up to date");
    } else {
        info!(versions = ?applied, "Migrations applied");
    }

    Ok(())
}
