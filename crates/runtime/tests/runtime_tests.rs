use std::path::Path;

use anyhow::{Context, Result};
use inkpost_auth::RegistrationForm;
use inkpost_config::AppConfig;
use inkpost_runtime::{BackendServices, ClearedData};
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(database_url: String) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = 2;
    config.auth.jwt_secret = Some("runtime-test-secret".into());
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

fn registration(email: &str) -> RegistrationForm {
    RegistrationForm {
        name: Some("Operator Test".into()),
        password: Some("longpass1".into()),
        confirm_password: Some("longpass1".into()),
        email: Some(email.into()),
        ..RegistrationForm::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(sqlite_url(&db_path));

    let services = initialise(&config).await?;
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'categories', 'articles') ORDER BY name",
    )
    .fetch_all(&services.db_pool)
    .await?;

    assert_eq!(tables, ["articles", "categories", "users"]);
    assert!(db_path.exists());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_requires_signing_secret() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("never.db");
    let mut config = build_config(sqlite_url(&db_path));
    config.auth.jwt_secret = Some("   ".into());

    let error = match BackendServices::initialise(&config).await {
        Ok(_) => panic!("expected initialise to fail without a signing secret"),
        Err(error) => error,
    };
    assert!(
        format!("{error:?}").contains("signing secret"),
        "unexpected error: {error:?}"
    );
    assert!(!db_path.exists(), "database must not be touched");

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn clear_all_removes_everything() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(sqlite_url(&temp_dir.path().join("clear.db")));
    let services = initialise(&config).await?;

    let registered = services
        .authenticator
        .register(registration("ops@example.com"))
        .await?;
    sqlx::query(
        "INSERT INTO categories (public_id, user_id, name, created_at, updated_at) VALUES ('c1', ?, 'ops', '', '')",
    )
    .bind(registered.user.id)
    .execute(&services.db_pool)
    .await?;

    let cleared = services.clear_all().await?;
    assert_eq!(
        cleared,
        ClearedData {
            users: 1,
            categories: 1,
            articles: 0,
        }
    );
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&services.db_pool)
        .await?;
    assert_eq!(users, 0);

    Ok(())
}
