//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::mcp::protocol::SERVER_NAME;

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Server identity.
    #[serde(default)]
    pub server: ServerConfig,

    /// Which transport the binary starts.
    #[serde(default)]
    pub transport: TransportKind,

    /// HTTP listener settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "server.name must not be empty".to_string(),
            });
        }

        if self.http.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "http.port must be between 1 and 65535".to_string(),
            });
        }

        if self.http.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid http.host '{}'. Must be an IP address such as 127.0.0.1",
                    self.http.host
                ),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

/// Server identity settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Name advertised in `serverInfo`.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    SERVER_NAME.to_string()
}

/// Transport the binary serves on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON over HTTP.
    Http,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// IP address to bind. Default: "127.0.0.1"
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port. Default: 8080
    #[serde(default = "default_port")]
    pub port: u16,
}

impl HttpConfig {
    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::ValidationError {
                message: format!("Invalid http.host '{}'", self.host),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.server.name, SERVER_NAME);
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "server": { "name": "lab-host" },
            "transport": "http",
            "http": { "host": "0.0.0.0", "port": 9000 },
            "logging": { "level": "debug" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.name, "lab-host");
        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(
            config.http.socket_addr().unwrap(),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn http_config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn logging_config_defaults() {
        assert_eq!(LoggingConfig::default().level, "warn");
    }

    #[test]
    fn reject_zero_port() {
        let config: Config = serde_json::from_str(r#"{"http": {"port": 0}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_hostname() {
        let config: Config = serde_json::from_str(r#"{"http": {"host": "localhost"}}"#).unwrap();
        assert!(config.validate().is_err());
        assert!(config.http.socket_addr().is_err());
    }

    #[test]
    fn reject_invalid_log_level() {
        let config: Config = serde_json::from_str(r#"{"logging": {"level": "loud"}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validation"));
    }

    #[test]
    fn reject_empty_server_name() {
        let config: Config = serde_json::from_str(r#"{"server": {"name": "  "}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_transport() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"transport": "grpc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let result: Result<Config, _> = serde_json::from_str(r#"{"unknown_field": "value"}"#);
        assert!(result.is_err());
    }
}
