//! Errors raised while loading or validating the Snippetbox configuration.
//!
//! Every variant points at what to fix: a file path, a dotted key such as
//! `server.http_addr`, or an override variable such as
//! `SNIPPETBOX__LOGGING__FORMAT`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file {} does not exist", path.display())]
    MissingFile {
        /// Requested path.
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("cannot read config file {}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is neither `.toml` nor `.json`, or an unknown format name
    /// was passed to [`ConfigLoader::with_string`](crate::ConfigLoader::with_string).
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Malformed TOML, or a key the schema does not know.
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or a key the schema does not know.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A loaded value is out of range.
    #[error("{key}: {reason}")]
    InvalidValue {
        /// Dotted key, e.g. `server.max_body_bytes`.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `SNIPPETBOX__*` variable does not name a key or does not parse.
    #[error("environment override {var}: {reason}")]
    EnvOverride {
        /// Variable name.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A `.env` file exists but could not be loaded.
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl ConfigError {
    pub(crate) fn missing_file(path: impl Into<PathBuf>) -> Self {
        Self::MissingFile { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env_override(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvOverride {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Returns the dotted key or variable name the error is about, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { key, .. } => Some(key),
            Self::EnvOverride { var, .. } => Some(var),
            _ => None,
        }
    }
}
