use anyhow::{Context, Result};
use inkpost_api::AppState;
use inkpost_auth::Authenticator;
use inkpost_config::AppConfig;
use inkpost_database::initialize_database;
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` wins; the default is `info`.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Counts removed by [`BackendServices::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearedData {
    pub users: u64,
    pub categories: u64,
    pub articles: u64,
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        config
            .auth
            .signing_secret()
            .context("refusing to start without a session signing secret")?;

        let db_pool = initialize_database(&config.database).await?;

        let authenticator = Authenticator::from_config(db_pool.clone(), &config.auth)
            .context("failed to build authenticator")?;

        info!(
            scheme = config.auth.password_scheme.as_str(),
            "authenticator ready"
        );

        Ok(Self {
            db_pool,
            authenticator,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.db_pool.clone(), self.authenticator.clone())
    }

    /// Operator-side wipe of every article, category and user.
    pub async fn clear_all(&self) -> Result<ClearedData> {
        let mut tx = self.db_pool.begin().await?;

        let articles = sqlx::query("DELETE FROM articles")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let categories = sqlx::query("DELETE FROM categories")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let users = sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.context("failed to commit data wipe")?;

        let cleared = ClearedData {
            users,
            categories,
            articles,
        };
        warn!(?cleared, "cleared all data");
        Ok(cleared)
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
