//! # Snippetbox Server
//!
//! The HTTP side of Snippetbox:
//!
//! - [`Application`]: the shared context handed to every handler, and the
//!   renderer ([`Application::render`])
//! - [`ErrorReporter`]: the single place failures become responses and logs
//! - [`Router`]: method + path routing with `{param}` segments
//! - [`Server`]: the Hyper accept loop with graceful shutdown
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use snippetbox_core::MemoryStore;
//! use snippetbox_server::Application;
//! use snippetbox_templates::TemplateCache;
//!
//! # tokio_test::block_on(async {
//! let app = Application::new(Arc::new(TemplateCache::default()), Arc::new(MemoryStore::new()));
//!
//! let response = app.handle(Request::get("/missing").body(Bytes::new()).unwrap()).await;
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/snippetbox-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod error;
pub mod handlers;
pub mod middleware;
mod reporter;
pub mod response;
mod router;
mod server;
pub mod shutdown;
pub mod static_files;

pub use app::{Application, Route};
pub use error::ServerError;
pub use reporter::ErrorReporter;
pub use response::{HttpResponse, ResponseBody};
pub use router::{RouteOutcome, Router};
pub use server::Server;
pub use shutdown::{ConnectionTracker, ShutdownSignal};
pub use static_files::{StaticFileError, StaticFiles};
