//! The error reporter.
//!
//! The one place that turns an [`AppError`] into a response and the one
//! place that logs a failed request. Lower layers return errors and never
//! log them.
//!
//! Server faults are logged as a single structured `error` event carrying
//! `method`, `uri`, `stack`, `error` and `category`; the client only ever
//! sees the standard reason text of the status.

use std::backtrace::Backtrace;

use http::{header, HeaderValue, StatusCode};
use snippetbox_core::{AppError, RequestInfo};

use crate::response::{self, HttpResponse};

/// Translates failures into responses.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use snippetbox_server::ErrorReporter;
///
/// let response = ErrorReporter::new().client_error(StatusCode::NOT_FOUND);
/// assert_eq!(response.status(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    /// Creates a reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Logs a server fault with its request context and a stack snapshot,
    /// then answers with a generic 500.
    pub fn server_error(&self, info: &RequestInfo, err: &AppError) -> HttpResponse {
        let stack = Backtrace::force_capture();
        tracing::error!(
            method = %info.method(),
            uri = info.uri(),
            stack = %stack,
            error = %err.chain(),
            category = ?err.category(),
            "server error"
        );
        status_text(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Answers with `status` and its standard reason text.
    pub fn client_error(&self, status: StatusCode) -> HttpResponse {
        status_text(status)
    }

    /// Routes `err` to [`server_error`](Self::server_error) or
    /// [`client_error`](Self::client_error) by category.
    pub fn report(&self, info: &RequestInfo, err: AppError) -> HttpResponse {
        if err.is_server_fault() {
            self.server_error(info, &err)
        } else {
            self.client_error(err.status_code())
        }
    }
}

fn status_text(status: StatusCode) -> HttpResponse {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    let mut response = response::text(status, format!("{reason}\n"));
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
