//! Configuration management for the hypertodo server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Values that fail to parse fall back to the default with a warning.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "hypertodo_server=info,hypertodo_web=info,tower_http=debug";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Seed the store with sample todos on startup
    pub seed_todos: bool,
    /// Mark cookies `Secure` (HTTPS deployments)
    pub secure_cookies: bool,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Prometheus exporter port (exporter disabled when unset)
    pub metrics_port: Option<u16>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// `host:port` to listen on.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address of the Prometheus exporter, if enabled.
    #[must_use]
    pub fn metrics_address(&self) -> Option<SocketAddr> {
        self.metrics_port
            .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                metrics_port: None,
                shutdown_timeout: 30,
            },
            seed_todos: true,
            secure_cookies: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HYPERTODO_HOST` | `0.0.0.0` |
    /// | `HYPERTODO_PORT` | `8080` |
    /// | `HYPERTODO_SEED` | `true` |
    /// | `HYPERTODO_SECURE_COOKIES` | `false` |
    /// | `METRICS_PORT` | unset (no exporter) |
    /// | `SHUTDOWN_TIMEOUT` | `30` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: lookup("HYPERTODO_HOST")
                    .filter(|h| !h.trim().is_empty())
                    .unwrap_or(defaults.server.host),
                port: parsed(&lookup, "HYPERTODO_PORT").unwrap_or(defaults.server.port),
                metrics_port: parsed(&lookup, "METRICS_PORT"),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT")
                    .unwrap_or(defaults.server.shutdown_timeout),
            },
            seed_todos: flag(&lookup, "HYPERTODO_SEED").unwrap_or(defaults.seed_todos),
            secure_cookies: flag(&lookup, "HYPERTODO_SECURE_COOKIES")
                .unwrap_or(defaults.secure_cookies),
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let value = raw.trim().parse().ok();
    if value.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring unparsable configuration value");
    }
    value
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable configuration flag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.server.metrics_address(), None);
        assert!(config.seed_todos);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HYPERTODO_HOST", "127.0.0.1"),
            ("HYPERTODO_PORT", "3000"),
            ("HYPERTODO_SEED", "false"),
            ("HYPERTODO_SECURE_COOKIES", "1"),
            ("METRICS_PORT", "9000"),
            ("SHUTDOWN_TIMEOUT", "5"),
        ]);

        assert_eq!(config.server.address(), "127.0.0.1:3000");
        assert_eq!(
            config.server.metrics_address(),
            Some(SocketAddr::from(([0, 0, 0, 0], 9000)))
        );
        assert_eq!(config.server.shutdown_timeout, 5);
        assert!(!config.seed_todos);
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("HYPERTODO_HOST", "  "),
            ("HYPERTODO_PORT", "eighty"),
            ("HYPERTODO_SEED", "maybe"),
            ("METRICS_PORT", "70000"),
        ]);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.seed_todos);
        assert_eq!(config.server.metrics_port, None);
    }

    #[test]
    fn test_flag_spellings() {
        for (raw, expected) in [("TRUE", true), (" yes ", true), ("off", false), ("0", false)] {
            assert_eq!(config(&[("HYPERTODO_SECURE_COOKIES", raw)]).secure_cookies, expected);
        }
    }
}
