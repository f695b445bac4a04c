//! Gateway configuration.
//!
//! Loaded once at startup from a TOML file and treated as immutable for the
//! lifetime of the process. Components receive the pieces they need; nothing
//! reads configuration ad hoc.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use tenant_gate_auth::{
    BearerScheme, InMemoryUserDirectory, MAX_TOKEN_LIFETIME_SECS, ServiceCredential, TenantGrants,
    UserRecord, UserStatus,
};
use tenant_gate_core::UserId;
use tenant_gate_observability::LogFormat;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "TENANT_GATE_CONFIG";

/// Environment variable overriding `jwt.secret`.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const DEFAULT_CONFIG_PATH: &str = "tenant-gate.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub http_server: HttpServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub services_auth_keys: Vec<ServiceCredential>,
    /// Seed for the in-memory user directory. Development only.
    #[serde(default)]
    pub dev_users: Vec<DevUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl HttpServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds, at most ten years.
    #[serde(default = "default_lifetime")]
    pub lifetime: u64,
}

impl core::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

fn default_lifetime() -> u64 {
    3600
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub bearer_scheme: BearerScheme,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Capture every dispatched request through the request-log hook.
    #[serde(default)]
    pub enable_http_requests_log: bool,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Clone, Deserialize)]
pub struct DevUser {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    /// bcrypt hash of the user's password.
    pub password_hash: String,
    #[serde(default)]
    pub permissions: TenantGrants,
}

impl core::fmt::Debug for DevUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DevUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

impl GatewayConfig {
    /// Load from the file named by `TENANT_GATE_CONFIG` (default
    /// `tenant-gate.toml`), apply the `JWT_SECRET` override and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::parse_file(Path::new(&path))?;

        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            config.jwt.secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::invalid("jwt.secret must not be empty"));
        }
        self.token_lifetime()?;

        let mut keys = HashSet::new();
        for svc in &self.services_auth_keys {
            if svc.name.trim().is_empty() {
                return Err(ConfigError::invalid("services_auth_keys: name must not be empty"));
            }
            if svc.key.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "services_auth_keys[{}]: key must not be empty",
                    svc.name
                )));
            }
            if self.auth.bearer_scheme.matches(&svc.key) {
                return Err(ConfigError::invalid(format!(
                    "services_auth_keys[{}]: key would be read as a bearer token",
                    svc.name
                )));
            }
            if !keys.insert(svc.key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "services_auth_keys[{}]: duplicate key",
                    svc.name
                )));
            }
        }

        let mut ids = HashSet::new();
        for user in &self.dev_users {
            if !ids.insert(user.id) {
                return Err(ConfigError::invalid(format!("dev_users: duplicate id {}", user.id)));
            }
            if user.password_hash.parse::<bcrypt::HashParts>().is_err() {
                return Err(ConfigError::invalid(format!(
                    "dev_users[{}]: password_hash is not a bcrypt hash",
                    user.username
                )));
            }
        }

        Ok(())
    }

    /// `jwt.lifetime` as a duration.
    pub fn token_lifetime(&self) -> Result<Duration, ConfigError> {
        i64::try_from(self.jwt.lifetime)
            .ok()
            .filter(|secs| (1..=MAX_TOKEN_LIFETIME_SECS).contains(secs))
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                ConfigError::invalid(format!(
                    "jwt.lifetime must be between 1 and {MAX_TOKEN_LIFETIME_SECS} seconds"
                ))
            })
    }

    /// Build the in-memory directory from `dev_users`.
    pub fn dev_directory(&self) -> InMemoryUserDirectory {
        self.dev_users
            .iter()
            .fold(InMemoryUserDirectory::new(), |dir, user| {
                dir.with_user(
                    UserRecord {
                        id: user.id,
                        username: user.username.clone(),
                        display_name: user.display_name.clone(),
                        status: UserStatus::Active,
                    },
                    user.password_hash.clone(),
                    user.permissions.clone(),
                )
            })
    }
}
