//! CLI module for the Virtua Mod backend
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server (default)
//! - `migrate`: manage the PostgreSQL schema

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Virtua Mod backend - accounts, session tokens and contact form relay
#[derive(Parser)]
#[command(name = "virtua-mod-backend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Apply, inspect or revert database migrations
    Migrate(migrate::MigrateArgs),
}

/// Load `.env` and the layered configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["virtua-mod-backend"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["virtua-mod-backend", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_parse_migrate_revert() {
        let cli = Cli::try_parse_from(["virtua-mod-backend", "migrate", "--revert"]).unwrap();

        match cli.command {
            Some(Command::Migrate(args)) => {
                assert!(args.revert);
                assert!(!args.status);
            }
            _ => panic!("expected migrate command"),
        }
    }

    #[test]
    fn test_migrate_flags_conflict() {
        assert!(
            Cli::try_parse_from(["virtua-mod-backend", "migrate", "--revert", "--status"]).is_err()
        );
    }
}
