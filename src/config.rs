//! Configuration management for the LightRAG bridge

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Fallback proxy URL when neither the user nor the deployment sets one
pub const FALLBACK_PROXY_URL: &str = "http://localhost:8081";

/// Default request timeout: 5 minutes
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default upload cap: 50MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub lightrag: LightragConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightragConfig {
    /// Deployment-wide default target (`LIGHTRAG_PROXY_URL`)
    pub proxy_url: Option<String>,
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl LightragConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LightragConfig {
    fn default() -> Self {
        LightragConfig {
            proxy_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3080,
            },
            lightrag: LightragConfig::default(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 3080)?,
            },
            lightrag: LightragConfig {
                proxy_url: env::var("LIGHTRAG_PROXY_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                timeout_secs: parse_var("LIGHTRAG_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                max_upload_bytes: parse_var("LIGHTRAG_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        Err(_) => Ok(default),
    }
}

/// Resolved base URL of the LightRAG proxy for a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingTarget {
    base_url: String,
}

impl ForwardingTarget {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the target: per-user override, then deployment default, then fallback.
    ///
    /// Blank values at either level count as unset.
    pub fn resolve(user_override: Option<&str>, config: &LightragConfig) -> Self {
        let chosen = user_override
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .or_else(|| {
                config
                    .proxy_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
            })
            .unwrap_or(FALLBACK_PROXY_URL);
        Self::new(chosen)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a remote path (starting with `/`) onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
