//! Typed configuration for Snippetbox.
//!
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use snippetbox_config::ConfigLoader;
//!
//! # fn main() -> Result<(), snippetbox_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("snippetbox.toml")?
//!     .with_env_prefix("SNIPPETBOX")
//!     .load()?;
//!
//! println!("Server will listen on: {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:4000"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 10485760
//!
//! [ui]
//! template_dir = "./ui/html"
//! static_dir = "./ui/static"
//! serve_static = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every key can be overridden as `SNIPPETBOX__SECTION__KEY`, for example
//! `SNIPPETBOX__SERVER__HTTP_ADDR=127.0.0.1:9000`.

#![doc(html_root_url = "https://docs.rs/snippetbox-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{SnippetboxConfig, SnippetboxConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, ServerConfig, UiConfig};
