//! Registration, login and session authentication for Inkpost.
//!
//! [`Authenticator`] sequences the pieces: the validator, the user store, the
//! credential hasher and the session issuer. Each stage can short-circuit
//! with an [`AuthError`].

use std::sync::Arc;

use inkpost_config::AuthConfig;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

pub mod error;
pub mod messages;
pub mod password;
pub mod session;
pub mod store;
pub mod sudo;
pub mod validation;

pub use error::AuthError;
pub use password::{hasher_from_config, Argon2Hasher, CredentialHasher, LegacyDigest};
pub use session::{Claims, SessionIssuer, SessionToken, SESSION_COOKIE_NAME};
pub use store::{NewUser, User, UserStore};
pub use sudo::SudoGate;
pub use validation::{
    validate_registration, RegistrationForm, ValidRegistration, ValidationError,
    ValidationPolicy,
};

/// A user together with the session just issued for them.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub session: SessionToken,
}

#[derive(Clone)]
pub struct Authenticator {
    store: UserStore,
    hasher: Arc<dyn CredentialHasher>,
    sessions: SessionIssuer,
    policy: ValidationPolicy,
    sudo: SudoGate,
}

impl Authenticator {
    pub fn new(
        store: UserStore,
        hasher: Arc<dyn CredentialHasher>,
        sessions: SessionIssuer,
        policy: ValidationPolicy,
        sudo: SudoGate,
    ) -> Self {
        Self {
            store,
            hasher,
            sessions,
            policy,
            sudo,
        }
    }

    /// Wire everything from configuration. Fails without a signing secret.
    pub fn from_config(pool: SqlitePool, config: &AuthConfig) -> anyhow::Result<Self> {
        let sessions = SessionIssuer::from_config(config)?;
        let sudo = SudoGate::new(config.sudo_secret.clone());
        if !sudo.is_configured() {
            warn!("no sudo secret configured; bulk delete routes will refuse every request");
        }

        Ok(Self::new(
            UserStore::new(pool),
            hasher_from_config(config),
            sessions,
            ValidationPolicy {
                password_min_length: config.password_min_length,
            },
            sudo,
        ))
    }

    pub fn pool(&self) -> SqlitePool {
        self.store.pool().clone()
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    pub fn sudo(&self) -> &SudoGate {
        &self.sudo
    }

    /// Validate, check for an existing account, hash, persist, then sign a
    /// session for the new user.
    pub async fn register(&self, form: RegistrationForm) -> Result<Authenticated, AuthError> {
        debug!(stage = "received", "registration");

        let valid = validate_registration(form, &self.policy)?;
        debug!(stage = "validated", email = %valid.email, "registration");

        if self.store.find_by_email(&valid.email).await?.is_some() {
            debug!(stage = "duplicate_checked", email = %valid.email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }
        debug!(stage = "duplicate_checked", "registration");

        let ValidRegistration {
            name,
            email,
            password,
            phone,
            bio,
        } = valid;
        let password_digest = self.hasher.hash(&password)?;
        debug!(stage = "hashed", scheme = self.hasher.scheme().as_str(), "registration");

        let user = self
            .store
            .insert(&NewUser {
                name,
                email,
                password_digest,
                phone,
                bio,
            })
            .await?;
        debug!(stage = "persisted", user = %user.public_id, "registration");

        let session = self.sessions.issue(&user.public_id)?;
        debug!(stage = "session_issued", user = %user.public_id, "registration");

        info!(user = %user.public_id, "registered new user");
        Ok(Authenticated { user, session })
    }

    /// Check an email and password pair and sign a fresh session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Authenticated, AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let Some(credentials) = self.store.find_credentials(email).await? else {
            debug!(%email, "login for unknown email");
            return Err(AuthError::WrongCredentials);
        };

        if !self.hasher.verify(password, &credentials.password_digest)? {
            debug!(user = %credentials.user.public_id, "login with wrong password");
            return Err(AuthError::WrongCredentials);
        }

        let session = self.sessions.issue(&credentials.user.public_id)?;
        debug!(user = %credentials.user.public_id, "logged in");

        Ok(Authenticated {
            user: credentials.user,
            session,
        })
    }

    /// Resolve a session token to the user it was issued for.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.sessions.verify(token)?;

        self.store
            .find_by_public_id(&claims.sub)
            .await?
            .ok_or(AuthError::UserGone)
    }

    /// Remove every user once the sudo secret checks out.
    pub async fn delete_all_users(&self, sudo_secret: Option<&str>) -> Result<u64, AuthError> {
        self.sudo.authorize(sudo_secret)?;

        let removed = self.store.delete_all().await?;
        warn!(removed, "deleted all users");
        Ok(removed)
    }
}
