//! Response construction helpers.
//!
//! Every response body is a fully materialised [`Full<Bytes>`]: nothing is
//! streamed, so a response either exists completely or not at all.

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Content type of rendered pages.
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Content type of plain-text error bodies.
pub const TEXT_UTF8: &str = "text/plain; charset=utf-8";

/// Builds a response with the given status, content type and body.
pub fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Builds an HTML response.
pub fn html(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, HTML_UTF8, body)
}

/// Builds a plain-text response.
pub fn text(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    with_body(status, TEXT_UTF8, body)
}

/// Builds a `303 See Other` redirect.
///
/// A location that is not a valid header value is dropped; callers only
/// pass paths they built themselves.
pub fn see_other(location: &str) -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::SEE_OTHER;
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}
