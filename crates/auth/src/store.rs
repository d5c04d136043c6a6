//! User records in the database.

use chrono::Utc;
use cuid2::CuidConstructor;
use once_cell::sync::Lazy;
use sqlx::{FromRow, SqlitePool};

use crate::AuthError;

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

const USER_COLUMNS: &str = "id, public_id, name, email, phone, bio, created_at";

/// A registered account. The password digest is deliberately not a field.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
}

/// Fields for a user about to be inserted.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_digest: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// A user together with the digest needed to check a login.
pub struct StoredCredentials {
    pub user: User,
    pub password_digest: String,
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredCredentials {
            user: row.user,
            password_digest: row.password,
        }))
    }

    /// Insert a user. A concurrent registration that won the race on the
    /// unique email index surfaces as [`AuthError::DuplicateEmail`].
    pub async fn insert(&self, new_user: &NewUser) -> Result<User, AuthError> {
        let public_id = CUID.create_id();
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (public_id, name, email, password, phone, bio, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_digest)
        .bind(new_user.phone.as_deref())
        .bind(new_user.bio.as_deref())
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AuthError::DuplicateEmail
            } else {
                AuthError::Database(err)
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            public_id,
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            bio: new_user.bio.clone(),
            created_at,
        })
    }

    /// Remove every user. Categories and articles go with them.
    pub async fn delete_all(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub async fn list(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

/// Whether a database error is a `UNIQUE` constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
