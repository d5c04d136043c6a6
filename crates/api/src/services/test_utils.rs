//! Test utilities for service layer testing

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A migrated database in a temporary directory. Keep the directory alive.
pub async fn test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let connect_options = SqliteConnectOptions::from_str(&db_url)
        .expect("valid sqlite url")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Memory)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(connect_options)
        .await
        .expect("Failed to create test database");

    inkpost_database::run_migrations(&pool)
        .await
        .expect("Failed to migrate test database");

    (pool, temp_dir)
}

/// Insert a bare user row and return its row id.
pub async fn insert_user(pool: &SqlitePool, email: &str) -> i64 {
    sqlx::query(
        "INSERT INTO users (public_id, name, email, password, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(cuid2::create_id())
    .bind(email)
    .bind(email)
    .bind("digest")
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await
    .expect("Failed to insert user")
    .last_insert_rowid()
}
