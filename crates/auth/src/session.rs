//! Signed session tokens and the `jwt` cookie that carries them.

use chrono::{DateTime, Duration, Utc};
use inkpost_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::AuthError;

pub const SESSION_COOKIE_NAME: &str = "jwt";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Public id of the user
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// Roughly a century; keeps `Duration::seconds` within range.
const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Issues and verifies HS256 session tokens. Built once from configuration.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    cookie_secure: bool,
}

impl SessionIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl: Duration::hours(24),
            cookie_secure: false,
        }
    }

    /// Fails when no signing secret is configured.
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        let secret = config.signing_secret()?;
        let ttl_seconds = i64::try_from(config.session_ttl_seconds)
            .unwrap_or(MAX_TTL_SECONDS)
            .min(MAX_TTL_SECONDS);

        Ok(Self::new(secret, config.issuer.clone(), config.audience.clone())
            .with_ttl(Duration::seconds(ttl_seconds))
            .with_secure_cookie(config.cookie_secure))
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token asserting `public_id`.
    pub fn issue(&self, public_id: &str) -> Result<SessionToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let claims = Claims {
            sub: public_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(SessionToken { token, expires_at })
    }

    /// Check signature, issuer, audience and expiry. Any failure means the
    /// caller is simply not logged in.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(error = %err, "rejected session token");
                AuthError::NotLoggedIn
            })
    }

    /// `Set-Cookie` value carrying a freshly issued token.
    pub fn cookie(&self, token: &str) -> String {
        let max_age = self.ttl.num_seconds().max(0);
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that makes the client drop its session.
    pub fn clear_cookie(&self) -> String {
        let mut cookie =
            format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}
