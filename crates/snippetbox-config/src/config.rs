//! Main configuration types.
//!
//! This module provides the top-level [`SnippetboxConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, ServerConfig, UiConfig};

/// Complete Snippetbox server configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use snippetbox_config::SnippetboxConfig;
///
/// let config = SnippetboxConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:4000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SnippetboxConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Template and static asset locations.
    #[serde(default)]
    pub ui: UiConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SnippetboxConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> SnippetboxConfigBuilder {
        SnippetboxConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The request timeout or body limit is zero
    /// - The log level is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled && self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use snippetbox_config::SnippetboxConfig;
    ///
    /// let config = SnippetboxConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:4000".to_string();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON info logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.include_location = false;
        config
    }
}

/// Builder for [`SnippetboxConfig`].
#[derive(Debug, Default)]
pub struct SnippetboxConfigBuilder {
    server: Option<ServerConfig>,
    ui: Option<UiConfig>,
    logging: Option<LoggingConfig>,
}

impl SnippetboxConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the UI configuration.
    #[must_use]
    pub fn ui(mut self, ui: UiConfig) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration; unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> SnippetboxConfig {
        SnippetboxConfig {
            server: self.server.unwrap_or_default(),
            ui: self.ui.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<SnippetboxConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
