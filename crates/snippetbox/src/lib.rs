//! # Snippetbox
//!
//! A small server-rendered site for sharing text snippets.
//!
//! This crate ties the workspace together and ships the `snippetbox` binary:
//!
//! - [`core`]: error taxonomy, snippet store, template data
//! - [`extract`]: request context and the form decoder
//! - [`templates`]: the template cache
//! - [`config`]: layered configuration
//! - [`telemetry`]: structured logging
//! - [`server`]: routes, handlers, the error reporter and the HTTP loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snippetbox::config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().with_env_prefix("SNIPPETBOX").load()?;
//!     let app = snippetbox::build_application(&config)?;
//!
//!     snippetbox::server::Server::new(config.server, app).run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/snippetbox/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::Arc;

pub use snippetbox_config as config;
pub use snippetbox_core as core;
pub use snippetbox_extract as extract;
pub use snippetbox_server as server;
pub use snippetbox_telemetry as telemetry;
pub use snippetbox_templates as templates;

use snippetbox_config::{LoggingConfig, SnippetboxConfig};
use snippetbox_core::MemoryStore;
use snippetbox_server::{Application, StaticFiles};
use snippetbox_telemetry::LogConfig;
use snippetbox_templates::{TemplateCache, TemplateError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use snippetbox_config::{ConfigLoader, SnippetboxConfig};
    pub use snippetbox_core::{AppError, AppResult, Snippet, SnippetStore, TemplateData};
    pub use snippetbox_extract::{DecodeError, FormDecoder};
    pub use snippetbox_server::{Application, ErrorReporter, Server, ShutdownSignal};
    pub use snippetbox_templates::TemplateCache;
}

/// Builds the application described by `config`, backed by an in-memory store.
///
/// Fails if any template under `ui.template_dir` does not compile.
pub fn build_application(config: &SnippetboxConfig) -> Result<Application, TemplateError> {
    let templates = TemplateCache::build(&config.ui.template_dir)?;
    let app = Application::new(Arc::new(templates), Arc::new(MemoryStore::new()));

    Ok(if config.ui.serve_static {
        app.with_static_files(StaticFiles::new(&config.ui.static_dir))
    } else {
        app
    })
}

/// Translates the `[logging]` section into a subscriber configuration.
#[must_use]
pub fn log_config(logging: &LoggingConfig) -> LogConfig {
    use snippetbox_config::LogFormat as Configured;
    use snippetbox_telemetry::LogFormat;

    LogConfig {
        enabled: logging.enabled,
        level: logging.level.clone(),
        format: match logging.format {
            Configured::Json => LogFormat::Json,
            Configured::Pretty => LogFormat::Pretty,
            Configured::Compact => LogFormat::Compact,
        },
        file_line_info: logging.include_location,
        include_target: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snippetbox_config::UiConfig;

    const UI_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../ui");

    fn config(serve_static: bool) -> SnippetboxConfig {
        SnippetboxConfig::builder()
            .ui(UiConfig {
                template_dir: format!("{UI_DIR}/html").into(),
                static_dir: format!("{UI_DIR}/static").into(),
                serve_static,
            })
            .build()
    }

    #[test]
    fn test_build_application() {
        let app = build_application(&config(true)).unwrap();
        assert!(app.templates().contains("home"));
        assert!(app.static_files().is_some());
    }

    #[test]
    fn test_build_application_without_static() {
        let app = build_application(&config(false)).unwrap();
        assert!(app.static_files().is_none());
    }

    #[test]
    fn test_build_application_fails_on_missing_templates() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(false);
        config.ui.template_dir = dir.path().join("missing");

        assert!(build_application(&config).is_err());
    }

    #[test]
    fn test_log_config_mapping() {
        let logging = LoggingConfig {
            enabled: true,
            level: "debug".to_string(),
            format: snippetbox_config::LogFormat::Pretty,
            include_location: true,
        };

        let log = log_config(&logging);
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, snippetbox_telemetry::LogFormat::Pretty);
        assert!(log.file_line_info);
    }
}
