//! Per-request concerns applied around every route.

use std::net::SocketAddr;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, Uri, Version};

/// Value of the `Server` header.
pub const SERVER_NAME: &str = "snippetbox";

/// Policy allowing only same-origin resources plus Google Fonts.
pub const CONTENT_SECURITY_POLICY: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";

const SECURE_HEADERS: [(HeaderName, &str); 6] = [
    (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
    (header::REFERRER_POLICY, "origin-when-cross-origin"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "deny"),
    (header::X_XSS_PROTECTION, "0"),
    (header::SERVER, SERVER_NAME),
];

/// Sets the secure headers and `Server` on a response.
pub fn apply_common_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
}

/// Logs one `received request` event at info.
pub fn log_request(remote: SocketAddr, version: Version, method: &Method, uri: &Uri) {
    tracing::info!(
        ip = %remote.ip(),
        proto = ?version,
        method = %method,
        uri = %uri,
        "received request"
    );
}
