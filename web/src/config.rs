//! Configuration management for the EzraTask server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary loads a `.env` file first, if one exists.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid {
        /// Environment variable name
        key: &'static str,
        /// The rejected value
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// API surface configuration
    pub api: ApiConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (`EZRATASK_HOST`, default `0.0.0.0`)
    pub host: String,
    /// Port to bind to (`EZRATASK_PORT`, default `8080`)
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset (`EZRATASK_LOG_LEVEL`, default `info`)
    pub log_level: String,
}

/// API surface configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Origins allowed by CORS (`EZRATASK_CORS_ORIGINS`, comma separated)
    pub cors_origins: Vec<String>,
    /// Serve `/metrics` (`EZRATASK_METRICS_ENABLED`, default `true`)
    pub metrics_enabled: bool,
    /// **TESTING ONLY**: mount `POST /api/v1/test/reset`.
    ///
    /// `EZRATASK_ENABLE_TEST_ENDPOINTS`; defaults to `true` in debug builds
    /// and `false` in release builds.
    pub enable_test_endpoints: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec!["http://localhost:5173".to_string()],
            metrics_enabled: true,
            enable_test_endpoints: cfg!(debug_assertions),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("EZRATASK_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    key: "EZRATASK_PORT",
                    value,
                })?,
            None => defaults.server.port,
        };

        let cors_origins = match lookup("EZRATASK_CORS_ORIGINS") {
            Some(value) => parse_origins(value)?,
            None => defaults.api.cors_origins,
        };

        Ok(Self {
            server: ServerConfig {
                host: lookup("EZRATASK_HOST").unwrap_or(defaults.server.host),
                port,
                log_level: lookup("EZRATASK_LOG_LEVEL").unwrap_or(defaults.server.log_level),
            },
            api: ApiConfig {
                cors_origins,
                metrics_enabled: parse_flag(
                    &lookup,
                    "EZRATASK_METRICS_ENABLED",
                    defaults.api.metrics_enabled,
                )?,
                enable_test_endpoints: parse_flag(
                    &lookup,
                    "EZRATASK_ENABLE_TEST_ENDPOINTS",
                    defaults.api.enable_test_endpoints,
                )?,
            },
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "EZRATASK_HOST",
                value: self.server.host.clone(),
            })
    }
}

/// Comma separated origins. The wildcard is refused: CORS here allows
/// credentials, and browsers reject `*` together with credentials.
fn parse_origins(value: String) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        return Err(ConfigError::Invalid {
            key: "EZRATASK_CORS_ORIGINS",
            value,
        });
    }
    Ok(origins)
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
