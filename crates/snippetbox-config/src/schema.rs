//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration section.
///
/// # Example
///
/// ```
/// use snippetbox_config::ServerConfig;
///
/// let config = ServerConfig {
///     http_addr: "127.0.0.1:4000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.shutdown_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// HTTP server bind address.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_max_body_bytes() -> usize {
    10 << 20
}

/// UI assets section: templates and static files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Directory holding `base.html`, `partials/` and `pages/`.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Directory served under `/static/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Whether `/static/` is served at all.
    #[serde(default = "default_true")]
    pub serve_static: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            static_dir: default_static_dir(),
            serve_static: true,
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("./ui/html")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./ui/static")
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
    /// Human-readable single-line format.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, "0.0.0.0:4000");
        assert_eq!(config.shutdown_timeout_secs, 30);
        assert_eq!(config.request_timeout_ms, 30000);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_server_config_deserialize() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            shutdown_timeout_secs = 60
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:3000");
        assert_eq!(config.shutdown_timeout_secs, 60);
        assert_eq!(config.request_timeout_ms, 30000);
    }

    #[test]
    fn test_server_config_unknown_field_rejected() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            http2_enabled = true
        "#;
        let result: Result<ServerConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_ui_config_default() {
        let config = UiConfig::default();
        assert_eq!(config.template_dir, PathBuf::from("./ui/html"));
        assert_eq!(config.static_dir, PathBuf::from("./ui/static"));
        assert!(config.serve_static);
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);

        let format: LogFormat = serde_json::from_str(r#""compact""#).unwrap();
        assert_eq!(format, LogFormat::Compact);

        assert!(serde_json::from_str::<LogFormat>(r#""xml""#).is_err());
    }
}
