//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, `.env` and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::{ConfigError, LogFormat, SnippetboxConfig};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables (`PREFIX__SECTION__KEY`)
///
/// # Example
///
/// ```no_run
/// use snippetbox_config::ConfigLoader;
///
/// # fn main() -> Result<(), snippetbox_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("snippetbox.toml")?
///     .with_dotenv()?
///     .with_env_prefix("SNIPPETBOX")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: SnippetboxConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SnippetboxConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = SnippetboxConfig::default();
        self
    }

    /// Start with the development preset.
    ///
    /// # Example
    ///
    /// ```
    /// use snippetbox_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = SnippetboxConfig::development();
        self
    }

    /// Start with the production preset.
    #[must_use]
    pub fn with_production(mut self) -> Self {
        self.config = SnippetboxConfig::production();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format (TOML or JSON) is chosen by extension. The file replaces
    /// everything loaded so far; sections it omits take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, malformed or
    /// contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::missing_file(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml`/`json`).
    ///
    /// # Example
    ///
    /// ```
    /// use snippetbox_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [server]
    ///     http_addr = "127.0.0.1:3000"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat(format.to_string()))
            }
        };
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// With prefix "SNIPPETBOX":
    /// - `SNIPPETBOX__SERVER__HTTP_ADDR=0.0.0.0:9000`
    /// - `SNIPPETBOX__UI__TEMPLATE_DIR=/srv/snippetbox/html`
    /// - `SNIPPETBOX__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file from the working directory into the environment.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an override does not parse or validation
    /// fails.
    pub fn load(mut self) -> Result<SnippetboxConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars: Vec<(String, String)> = env::vars()
                .filter(|(k, _)| k.starts_with(&prefix))
                .collect();
            for (key, value) in vars {
                self.apply_env_var(&key, &value, &prefix)?;
            }
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without environment overrides or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> SnippetboxConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<SnippetboxConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // e.g. SNIPPETBOX_HOME: shares the prefix but is not an override
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();
        let server = &mut self.config.server;
        let ui = &mut self.config.ui;
        let logging = &mut self.config.logging;

        match parts.as_slice() {
            ["SERVER", "HTTP_ADDR"] => server.http_addr = value.to_string(),
            ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
                server.shutdown_timeout_secs = parse_int(key, value)?;
            }
            ["SERVER", "REQUEST_TIMEOUT_MS"] => server.request_timeout_ms = parse_int(key, value)?,
            ["SERVER", "MAX_BODY_BYTES"] => server.max_body_bytes = parse_int(key, value)?,

            ["UI", "TEMPLATE_DIR"] => ui.template_dir = value.into(),
            ["UI", "STATIC_DIR"] => ui.static_dir = value.into(),
            ["UI", "SERVE_STATIC"] => ui.serve_static = parse_flag(key, value)?,

            ["LOGGING", "ENABLED"] => logging.enabled = parse_flag(key, value)?,
            ["LOGGING", "LEVEL"] => logging.level = value.to_string(),
            ["LOGGING", "FORMAT"] => {
                logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    "compact" => LogFormat::Compact,
                    _ => {
                        return Err(ConfigError::env_override(
                            key,
                            "expected 'json', 'pretty' or 'compact'",
                        ))
                    }
                };
            }
            ["LOGGING", "INCLUDE_LOCATION"] => logging.include_location = parse_flag(key, value)?,

            _ => return Err(ConfigError::env_override(key, "unknown configuration key")),
        }

        Ok(())
    }
}

fn parse_int<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::env_override(key, "expected integer"))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::env_override(key, "expected boolean"))
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:4000");
    }

    #[test]
    fn test_loader_with_production() {
        let config = ConfigLoader::new().with_production().load().unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"ui": {"serve_static": false}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert!(!config.ui.serve_static);
        assert_eq!(config.server.http_addr, "0.0.0.0:4000");
    }

    #[test]
    fn test_loader_with_string_unknown_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ref f)) if f == "yaml"));
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/snippetbox.toml");
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/snippetbox.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.server.http_addr, "0.0.0.0:4000");
    }

    #[test]
    fn test_loader_with_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippetbox.toml");
        fs::write(
            &path,
            r#"
                [server]
                http_addr = "127.0.0.1:8443"
                request_timeout_ms = 5000

                [ui]
                template_dir = "/srv/html"

                [logging]
                format = "compact"
            "#,
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:8443");
        assert_eq!(config.server.request_timeout_ms, 5000);
        assert_eq!(config.ui.template_dir, PathBuf::from("/srv/html"));
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_loader_rejects_unknown_file_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippetbox.toml");
        fs::write(&path, "[server]\nport = 4000\n").unwrap();

        let result = ConfigLoader::new().with_file(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_loader_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippetbox.yaml");
        fs::write(&path, "server: {}\n").unwrap();

        let result = ConfigLoader::new().with_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_validates() {
        let result = ConfigLoader::new()
            .with_string("[server]\nhttp_addr = \"nowhere\"\n", "toml")
            .unwrap()
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));

        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    // Overrides go through apply_env_var so tests never touch the process
    // environment.

    #[test]
    fn test_apply_env_var_server() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__SERVER__HTTP_ADDR", "192.168.1.1:9000", "TEST").unwrap();
        loader.apply_env_var("TEST__SERVER__SHUTDOWN_TIMEOUT_SECS", "5", "TEST").unwrap();
        assert_eq!(loader.config.server.http_addr, "192.168.1.1:9000");
        assert_eq!(loader.config.server.shutdown_timeout_secs, 5);
    }

    #[test]
    fn test_apply_env_var_ui() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__UI__STATIC_DIR", "/srv/static", "TEST").unwrap();
        loader.apply_env_var("TEST__UI__SERVE_STATIC", "no", "TEST").unwrap();
        assert_eq!(loader.config.ui.static_dir, PathBuf::from("/srv/static"));
        assert!(!loader.config.ui.serve_static);
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader.apply_env_var("TEST__LOGGING__LEVEL", "debug", "TEST").unwrap();
        loader.apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST").unwrap();
        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);

        assert!(loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST").is_err());
    }

    #[test]
    fn test_apply_env_var_invalid_integer() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__SERVER__REQUEST_TIMEOUT_MS", "soon", "TEST");
        assert!(matches!(result, Err(ConfigError::EnvOverride { .. })));
    }

    #[test]
    fn test_apply_env_var_unknown_key() {
        let mut loader = ConfigLoader::new();
        assert!(loader.apply_env_var("TEST__SERVER__HTTP2", "true", "TEST").is_err());
        assert!(loader.apply_env_var("TESTING_HOME", "/tmp", "TEST").is_ok());
    }
}
