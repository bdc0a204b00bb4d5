//! Storage infrastructure - PostgreSQL pool and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_migrations, user_migrations, Migration, PostgresMigrator};
pub use postgres::PostgresConfig;
