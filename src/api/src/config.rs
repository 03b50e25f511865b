//! API configuration

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from the environment, falling back to defaults
    ///
    /// Variables: `PALISADE_HOST`, `PALISADE_PORT`, `RUST_LOG`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("PALISADE_HOST").unwrap_or(defaults.host),
            port: env::var("PALISADE_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
