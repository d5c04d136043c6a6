//! Password digests.
//!
//! Two schemes are supported. [`LegacyDigest`] reproduces the digests already
//! stored by earlier deployments: MD5 over the secret followed by one
//! application-wide suffix, hex encoded. It is deterministic and unsalted, so
//! a leaked table is cheap to attack. [`Argon2Hasher`] is the salted
//! replacement; switching to it means existing users must reset passwords.

use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use inkpost_config::{AuthConfig, PasswordScheme};
use md5::{Digest, Md5};

use crate::AuthError;

/// Turns plaintext secrets into stored digests and checks them later.
pub trait CredentialHasher: Send + Sync {
    fn scheme(&self) -> PasswordScheme;

    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError>;
}

/// `hex(md5(secret ++ suffix))`.
#[derive(Debug, Clone)]
pub struct LegacyDigest {
    suffix: String,
}

impl LegacyDigest {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn digest(&self, secret: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(secret.as_bytes());
        hasher.update(self.suffix.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl CredentialHasher for LegacyDigest {
    fn scheme(&self) -> PasswordScheme {
        PasswordScheme::LegacyMd5
    }

    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        Ok(self.digest(secret))
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError> {
        Ok(self.digest(secret).eq_ignore_ascii_case(digest))
    }
}

/// Argon2id with a random salt per digest.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn scheme(&self) -> PasswordScheme {
        PasswordScheme::Argon2
    }

    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| AuthError::PasswordHash(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError> {
        // A digest from the other scheme simply does not match.
        let Ok(parsed) = PasswordHash::new(digest) else {
            return Ok(false);
        };

        Ok(Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Build the hasher selected by `auth.password_scheme`.
pub fn hasher_from_config(config: &AuthConfig) -> Arc<dyn CredentialHasher> {
    match config.password_scheme {
        PasswordScheme::LegacyMd5 => Arc::new(LegacyDigest::new(config.digest_suffix.clone())),
        PasswordScheme::Argon2 => Arc::new(Argon2Hasher),
    }
}
