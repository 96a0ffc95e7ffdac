//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is what a handler receives once the server has
//! matched a route and collected the request body.

use crate::{ExtractionError, Params};
use bytes::Bytes;
use http::{header, HeaderMap, Method, Uri};
use snippetbox_core::RequestInfo;

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use snippetbox_extract::{ExtractionContext, Params};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/snippet/view/123"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.path_params().get("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Checks that the media type (parameters ignored) equals `expected`.
    pub fn require_content_type(&self, expected: &str) -> Result<(), ExtractionError> {
        let actual = self.content_type();
        let media_type = actual
            .and_then(|v| v.split(';').next())
            .map(str::trim);
        match media_type {
            Some(m) if m.eq_ignore_ascii_case(expected) => Ok(()),
            _ => Err(ExtractionError::unsupported_media_type(expected, actual)),
        }
    }

    /// Returns the error context for this request.
    #[must_use]
    pub fn request_info(&self) -> RequestInfo {
        let uri = self
            .uri
            .path_and_query()
            .map_or_else(|| self.uri.path().to_string(), ToString::to_string);
        RequestInfo::new(self.method.clone(), uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_content_type(value: Option<&str>) -> ExtractionContext {
        let mut headers = HeaderMap::new();
        if let Some(value) = value {
            headers.insert(header::CONTENT_TYPE, value.parse().unwrap());
        }
        ExtractionContext::new(
            Method::POST,
            Uri::from_static("/snippet/create"),
            headers,
            Bytes::from_static(b"title=x"),
            Params::new(),
        )
    }

    #[test]
    fn test_extraction_context_creation() {
        let mut params = Params::new();
        params.push("id", "42");

        let ctx = ExtractionContext::new(
            Method::GET,
            Uri::from_static("/snippet/view/42?flash=1"),
            HeaderMap::new(),
            Bytes::new(),
            params,
        );

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/snippet/view/42");
        assert_eq!(ctx.path_params().get("id"), Some("42"));
        assert!(ctx.body().is_empty());
    }

    #[test]
    fn test_request_info_keeps_query() {
        let ctx = ExtractionContext::new(
            Method::GET,
            Uri::from_static("/snippet/view/42?flash=1"),
            HeaderMap::new(),
            Bytes::new(),
            Params::new(),
        );

        assert_eq!(ctx.request_info().to_string(), "GET /snippet/view/42?flash=1");
    }

    #[test]
    fn test_require_content_type() {
        let form = "application/x-www-form-urlencoded";

        assert!(ctx_with_content_type(Some(form)).require_content_type(form).is_ok());
        assert!(ctx_with_content_type(Some("application/x-www-form-urlencoded; charset=UTF-8"))
            .require_content_type(form)
            .is_ok());

        let err = ctx_with_content_type(Some("application/json"))
            .require_content_type(form)
            .unwrap_err();
        assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);

        assert!(ctx_with_content_type(None).require_content_type(form).is_err());
    }
}
