//! Inkpost Database Crate
//!
//! Connection management and embedded migrations for the SQLite store that
//! backs users, categories and articles.

use inkpost_config::DatabaseConfig;
use sqlx::SqlitePool;
use tracing::error;

pub mod connection;
pub mod migrations;

pub use connection::prepare_database;
pub use migrations::{run_migrations, MIGRATOR};

/// Open the pool and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = prepare_database(config).await?;

    if let Err(err) = run_migrations(&pool).await {
        error!(error = ?err, "failed to migrate database");
        return Err(err);
    }

    Ok(pool)
}
