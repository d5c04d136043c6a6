//! Database migrations

use anyhow::Context;
use sqlx::SqlitePool;
use tracing::info;

/// Migrations embedded from the workspace `migrations/` directory
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use inkpost_config::DatabaseConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_migrations_create_schema() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_migrations.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // Re-running is a no-op
        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'categories', 'articles') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert_eq!(tables, vec!["articles", "categories", "users"]);
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("unique.db").display()),
            max_connections: 1,
        };
        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let insert = "INSERT INTO users (public_id, name, email, password, created_at) VALUES (?, 'A', 'a@example.com', 'x', '2024-01-01T00:00:00Z')";
        sqlx::query(insert).bind("first").execute(&pool).await.unwrap();
        let error = sqlx::query(insert)
            .bind("second")
            .execute(&pool)
            .await
            .unwrap_err();

        let is_unique = error
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique, "expected unique violation, got {error}");
    }
}
