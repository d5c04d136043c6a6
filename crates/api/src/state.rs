use inkpost_auth::{Authenticator, SudoGate, User};
use sqlx::SqlitePool;

use crate::ApiError;

/// Shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    db_pool: SqlitePool,
    authenticator: Authenticator,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, authenticator: Authenticator) -> Self {
        Self {
            db_pool,
            authenticator,
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn sudo(&self) -> &SudoGate {
        self.authenticator.sudo()
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        self.authenticator
            .authenticate_token(token)
            .await
            .map_err(ApiError::from)
    }
}
