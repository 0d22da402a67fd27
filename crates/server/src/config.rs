//! Configuration management for the Confect gateway

use crate::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Upstream commerce API configuration
    pub upstream: UpstreamConfig,

    /// Runtime environment; controls the `Secure` cookie attribute
    pub environment: Environment,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the HTTP server
    pub bind_addr: SocketAddr,

    /// Enable CORS for the web interface
    pub cors_enabled: bool,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Upstream commerce API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the commerce API
    pub base_url: String,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            environment: Environment::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".parse().expect("valid default bind addr"),
            cors_enabled: true,
            timeout_secs: 30,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::Development
    }
}

impl Settings {
    /// Load configuration, layering an optional file and
    /// `CONFECT`-prefixed environment variables over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a value fails to
    /// deserialize
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("CONFECT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_grade() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Development);
        assert!(!settings.environment.is_production());
        assert!(settings.server.cors_enabled);
        assert_eq!(settings.server.bind_addr.port(), 3000);
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(
            settings.upstream.base_url,
            UpstreamConfig::default().base_url
        );
    }
}
