//! HTTP server implementation.
//!
//! Built on Hyper and Tokio:
//!
//! - one task per accepted connection, HTTP/1.1 only
//! - request bodies collected up to `max_body_bytes`, then handed to
//!   [`Application::handle`]
//! - each request bounded by `request_timeout_ms`
//! - graceful shutdown waiting up to `shutdown_timeout_secs` for open
//!   connections
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snippetbox_config::ServerConfig;
//! use snippetbox_core::MemoryStore;
//! use snippetbox_server::{Application, Server};
//! use snippetbox_templates::TemplateCache;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let templates = Arc::new(TemplateCache::build("./ui/html")?);
//!     let app = Application::new(templates, Arc::new(MemoryStore::new()));
//!
//!     Server::new(ServerConfig::default(), app).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use snippetbox_config::ServerConfig;
use snippetbox_core::{AppError, RequestInfo};
use snippetbox_extract::ExtractionError;
use tokio::net::{TcpListener, TcpStream};

use crate::middleware;
use crate::response::HttpResponse;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use crate::{Application, ServerError};

/// The Snippetbox HTTP server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    app: Arc<Application>,
}

impl Server {
    /// Creates a server for `app`.
    #[must_use]
    pub fn new(config: ServerConfig, app: Application) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the application.
    #[must_use]
    pub fn app(&self) -> &Application {
        &self.app
    }

    /// Binds the configured address and serves until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr =
            self.config
                .http_addr
                .parse()
                .map_err(|source| ServerError::InvalidAddress {
                    addr: self.config.http_addr.clone(),
                    source,
                })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(addr = %addr, "starting server");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote, shutdown).await {
                                tracing::debug!(ip = %remote.ip(), error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => break,
            }
        }

        let grace = Duration::from_secs(server.config.shutdown_timeout_secs);
        tracing::info!(
            connections = tracker.active_connections(),
            "shutting down, waiting for open connections"
        );
        if tokio::time::timeout(grace, tracker.wait_idle()).await.is_err() {
            tracing::warn!(
                connections = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(remote, req).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, remote: SocketAddr, req: Request<Incoming>) -> HttpResponse {
        middleware::log_request(remote, req.version(), req.method(), req.uri());

        let info = RequestInfo::from_request(&req);
        let timeout = Duration::from_millis(self.config.request_timeout_ms);

        let served = tokio::time::timeout(timeout, async {
            match self.collect(req).await {
                Ok(req) => self.app.handle(req).await,
                Err(err) => {
                    let mut response = self.app.reporter().report(&info, err);
                    middleware::apply_common_headers(response.headers_mut());
                    response
                }
            }
        })
        .await;

        served.unwrap_or_else(|_| {
            let mut response = self.app.reporter().client_error(StatusCode::SERVICE_UNAVAILABLE);
            middleware::apply_common_headers(response.headers_mut());
            response
        })
    }

    /// Buffers the body, refusing anything over `max_body_bytes`.
    async fn collect(&self, req: Request<Incoming>) -> Result<Request<Bytes>, AppError> {
        let max = self.config.max_body_bytes;
        let declared = req
            .headers()
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(declared) = declared.filter(|&len| len > max) {
            return Err(ExtractionError::payload_too_large(max, declared).into());
        }

        let (parts, body) = req.into_parts();
        let bytes = match Limited::new(body, max).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => {
                return Err(ExtractionError::body_over_limit(max).into())
            }
            Err(e) => return Err(AppError::bad_request(format!("failed to read request body: {e}"))),
        };
        Ok(Request::from_parts(parts, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snippetbox_core::MemoryStore;
    use snippetbox_templates::TemplateCache;

    fn server(http_addr: &str) -> Server {
        let config = ServerConfig {
            http_addr: http_addr.to_string(),
            shutdown_timeout_secs: 1,
            ..ServerConfig::default()
        };
        let app = Application::new(
            Arc::new(TemplateCache::default()),
            Arc::new(MemoryStore::new()),
        );
        Server::new(config, app)
    }

    #[tokio::test]
    async fn test_run_invalid_address() {
        let result = server("not-a-valid-address")
            .run_with_shutdown(ShutdownSignal::new())
            .await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_run_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let result = server(&addr.to_string())
            .run_with_shutdown(ShutdownSignal::new())
            .await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_run_and_shutdown() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server("127.0.0.1:0").run_with_shutdown(shutdown),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
    }
}
