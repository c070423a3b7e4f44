//! Configuration module for wicket.

use serde::Deserialize;
use std::path::Path;

use tracing::warn;
use validator::Validate;

use crate::auth::{hash_password, DEFAULT_SESSION_TTL_SECS};
use crate::store::{Role, UserRecord};
use crate::{Result, WicketError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Authentication and session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session signing secret (must be set; no default).
    #[serde(default)]
    pub secret: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Mark the session cookie Secure (HTTPS-only deployments).
    #[serde(default)]
    pub cookie_secure: bool,
    /// Failed login attempts per username before lockout.
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// Username lockout duration in seconds.
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
    /// Rate limit for the login endpoint (requests per minute per IP).
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit: u32,
}

fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_max_login_attempts() -> u32 {
    3
}

fn default_lockout_secs() -> u64 {
    300
}

fn default_login_rate_limit() -> u32 {
    5 // 5 requests per minute
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            session_ttl_secs: default_session_ttl(),
            cookie_secure: false,
            max_login_attempts: default_max_login_attempts(),
            lockout_secs: default_lockout_secs(),
            login_rate_limit: default_login_rate_limit(),
        }
    }
}

/// Credential store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend kind: "sqlite" or "memory".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Path to the SQLite database file (ignored by the memory backend).
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "sqlite".to_string()
}

fn default_store_path() -> String {
    "data/wicket.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/wicket.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// A user provisioned at startup.
///
/// Either `password_hash` (an Argon2id PHC string) or a plaintext
/// `password` must be set. Plaintext entries are hashed at startup and
/// logged as a warning; they are meant for development configs only.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeedUser {
    /// Login username (3-50 characters, matched case-sensitively).
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Human-readable name (1-100 characters).
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    /// Pre-hashed password (PHC string).
    #[serde(default)]
    pub password_hash: Option<String>,
    /// Plaintext password, hashed at startup.
    #[serde(default)]
    pub password: Option<String>,
    /// Role, defaults to "user".
    #[serde(default)]
    pub role: Role,
    /// Email address (optional).
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}

impl SeedUser {
    /// Convert the seed entry into a storable record, hashing a plaintext
    /// password if no pre-hashed one was given.
    pub fn into_record(self) -> Result<UserRecord> {
        self.validate()
            .map_err(|e| WicketError::Validation(format!("seed user {}: {e}", self.username)))?;

        let password_hash = match (self.password_hash, self.password) {
            (Some(hash), _) => hash,
            (None, Some(password)) => {
                warn!(
                    username = %self.username,
                    "Seed user has a plaintext password; hashing it at startup"
                );
                hash_password(&password)?
            }
            (None, None) => {
                return Err(WicketError::Validation(format!(
                    "seed user {}: either password_hash or password must be set",
                    self.username
                )))
            }
        };

        let mut record = UserRecord::new(self.username, self.display_name, password_hash)
            .with_role(self.role);
        record.email = self.email;
        Ok(record)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Credential store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Users provisioned at startup.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(WicketError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WicketError::Validation(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `WICKET_SECRET`: Override the session signing secret
    pub fn apply_env_overrides(&mut self) {
        // Signing secret from environment variable (highest priority)
        if let Ok(secret) = std::env::var("WICKET_SECRET") {
            if !secret.is_empty() {
                self.auth.secret = secret;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The signing secret is not set
    /// - The store backend is not "sqlite" or "memory"
    /// - A seed user has no credential, or a username repeats
    pub fn validate(&self) -> Result<()> {
        if self.auth.secret.is_empty() {
            return Err(WicketError::Validation(
                "auth.secret is not set. \
                 Set it in config.toml or via the WICKET_SECRET environment variable."
                    .to_string(),
            ));
        }

        if self.store.backend != "sqlite" && self.store.backend != "memory" {
            return Err(WicketError::Validation(format!(
                "unknown store backend {:?} (expected \"sqlite\" or \"memory\")",
                self.store.backend
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            if user.password_hash.is_none() && user.password.is_none() {
                return Err(WicketError::Validation(format!(
                    "seed user {}: either password_hash or password must be set",
                    user.username
                )));
            }
            // Exact-match uniqueness; differently-cased names are distinct users
            if !seen.insert(user.username.as_str()) {
                return Err(WicketError::Validation(format!(
                    "seed user {} is listed twice",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// Convert the seed entries into storable records.
    pub fn seed_records(&self) -> Result<Vec<UserRecord>> {
        self.users
            .iter()
            .cloned()
            .map(SeedUser::into_record)
            .collect()
    }
}
