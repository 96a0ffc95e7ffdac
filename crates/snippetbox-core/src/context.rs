//! Request context types.
//!
//! [`RequestInfo`] is the error context captured at the point of failure: the
//! request line a server-fault diagnostic record is tagged with.

use http::{Method, Request, Uri};
use std::fmt;

/// Method and request URI of the request being served.
///
/// # Example
///
/// ```
/// use snippetbox_core::RequestInfo;
/// use http::Method;
///
/// let info = RequestInfo::new(Method::GET, "/snippet/view/1?x=2");
/// assert_eq!(info.uri(), "/snippet/view/1?x=2");
/// assert_eq!(info.to_string(), "GET /snippet/view/1?x=2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    method: Method,
    uri: String,
}

impl RequestInfo {
    /// Creates request info from a method and a request URI.
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
        }
    }

    /// Captures method and request URI (path plus query) from a request.
    #[must_use]
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self::new(req.method().clone(), request_uri(req.uri()))
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for RequestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.uri)
    }
}

/// Returns the path and query of a URI, dropping scheme and authority.
fn request_uri(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string)
}
