use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "inkpost.toml",
    "config/inkpost.toml",
    "crates/config/inkpost.toml",
    "../inkpost.toml",
    "../config/inkpost.toml",
    "../crates/config/inkpost.toml",
];

/// Suffix appended to every secret before the legacy digest is computed.
///
/// Stored digests depend on this exact value, so it only changes together with
/// a migration of every user record.
pub const DEFAULT_DIGEST_SUFFIX: &str = "chuntonggao*&^%$#";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://inkpost.db".to_string(),
            max_connections: 10,
        }
    }
}

/// How password digests are derived and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasswordScheme {
    /// `hex(md5(secret ++ suffix))`, compatible with existing stored digests.
    #[default]
    LegacyMd5,
    /// Salted Argon2id PHC strings.
    Argon2,
}

impl PasswordScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordScheme::LegacyMd5 => "legacy-md5",
            PasswordScheme::Argon2 => "argon2",
        }
    }
}

/// Session, password and administrative settings.
///
/// ```
/// use inkpost_config::{AuthConfig, PasswordScheme};
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.session_ttl_seconds, 86_400);
/// assert_eq!(auth.password_scheme, PasswordScheme::LegacyMd5);
/// assert!(auth.signing_secret().is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub sudo_secret: Option<String>,
    #[serde(default = "AuthConfig::default_session_ttl")]
    pub session_ttl_seconds: u64,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default = "AuthConfig::default_audience")]
    pub audience: String,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default)]
    pub password_scheme: PasswordScheme,
    #[serde(default = "AuthConfig::default_digest_suffix")]
    pub digest_suffix: String,
    #[serde(default = "AuthConfig::default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            sudo_secret: None,
            session_ttl_seconds: Self::default_session_ttl(),
            issuer: Self::default_issuer(),
            audience: Self::default_audience(),
            cookie_secure: false,
            password_scheme: PasswordScheme::default(),
            digest_suffix: Self::default_digest_suffix(),
            password_min_length: Self::default_password_min_length(),
        }
    }
}

impl AuthConfig {
    const fn default_session_ttl() -> u64 {
        86_400
    }

    fn default_issuer() -> String {
        "inkpost".to_string()
    }

    fn default_audience() -> String {
        "inkpost-web".to_string()
    }

    fn default_digest_suffix() -> String {
        DEFAULT_DIGEST_SUFFIX.to_string()
    }

    const fn default_password_min_length() -> usize {
        7
    }

    /// The key used to sign session tokens. A missing key is a startup error.
    pub fn signing_secret(&self) -> anyhow::Result<&str> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => bail!("auth.jwt_secret (or JWT_SECRET) must be set to sign session tokens"),
        }
    }
}

// Secrets stay out of log output.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("sudo_secret", &self.sudo_secret.as_ref().map(|_| "<redacted>"))
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_scheme", &self.password_scheme)
            .field("password_min_length", &self.password_min_length)
            .finish_non_exhaustive()
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use inkpost_config::load;
///
/// std::env::remove_var("INKPOST_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let session_ttl = defaults.auth.session_ttl_seconds;
    let session_ttl_i64 = i64::try_from(session_ttl).unwrap_or(i64::MAX);
    let min_length = i64::try_from(defaults.auth.password_min_length).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.session_ttl_seconds", session_ttl_i64)?
        .set_default("auth.issuer", defaults.auth.issuer.clone())?
        .set_default("auth.audience", defaults.auth.audience.clone())?
        .set_default("auth.cookie_secure", defaults.auth.cookie_secure)?
        .set_default("auth.password_scheme", defaults.auth.password_scheme.as_str())?
        .set_default("auth.digest_suffix", defaults.auth.digest_suffix.clone())?
        .set_default("auth.password_min_length", min_length)?;

    let environment_overrides = config::Environment::with_prefix("INKPOST").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("INKPOST_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via INKPOST_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    apply_conventional_overrides(&mut config);

    if config.auth.session_ttl_seconds > i64::MAX as u64 {
        config.auth.session_ttl_seconds = i64::MAX as u64;
    }

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

/// The plain variable names deployments already use win over everything else.
fn apply_conventional_overrides(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        config.auth.jwt_secret = Some(secret);
    }
    if let Ok(secret) = std::env::var("SUDO_SECRET") {
        config.auth.sudo_secret = Some(secret);
    }
}
