//! Server configuration.
//!
//! Loaded once at process start from an optional TOML file plus
//! `SENTRA__*` environment overrides (e.g. `SENTRA__SERVER__PORT=9090`).
//! Validation runs before anything else is built; a missing signing key
//! or malformed section ends the process with exit code 2.

use sentra_auth::config::AuthConfig;
use serde::{Deserialize, Serialize};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Redis cache configuration.
    #[serde(default)]
    pub redis: RedisConfig,

    /// Authentication and authorization configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Bootstrap configuration (initial root account).
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting found.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.redis.enabled && self.redis.url.is_empty() {
            return Err("redis.url is required when redis is enabled".into());
        }
        self.auth.validate().map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// The bind address as `host:port`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (overridden by `RUST_LOG` when set).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Redis cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Enable the shared Redis cache. When disabled the process runs with
    /// a local in-process cache (single-instance mode).
    #[serde(default)]
    pub enabled: bool,

    /// Redis connection URL (e.g. "redis://localhost:6379").
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_redis_url(),
        }
    }
}

/// Bootstrap configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// If set, creates a root account on startup (if not already
    /// present).
    #[serde(default)]
    pub root_user: Option<RootUserConfig>,
}

/// Configuration for the bootstrapped root account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootUserConfig {
    /// Root username.
    pub username: String,
    /// Root password in plain text (hashed before storage). Prefer the
    /// `SENTRA__BOOTSTRAP__ROOT_USER__PASSWORD` env var over the file.
    pub password: String,
    /// Root email address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Configuration loading.
pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Loads configuration from an optional TOML file plus `SENTRA__*`
    /// environment overrides, then validates it.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure; callers treat this as fatal.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("sentra.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("SENTRA")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
