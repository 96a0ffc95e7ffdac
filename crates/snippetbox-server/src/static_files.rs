//! Static file serving.
//!
//! Serves files below a root directory for `GET /static/{*path}`:
//!
//! - `ETag` / `If-None-Match` and `Last-Modified` / `If-Modified-Since`
//!   revalidation
//! - `HEAD` answered with headers only
//! - `..`, hidden files and symlinks escaping the root are refused
//! - directories are never listed
//!
//! # Example
//!
//! ```rust
//! use snippetbox_server::static_files::StaticFiles;
//!
//! let files = StaticFiles::new("./ui/static").cache_control("max-age=3600");
//! assert_eq!(files.root().to_str(), Some("./ui/static"));
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, Response, StatusCode};
use http_body_util::Full;
use snippetbox_core::AppError;
use thiserror::Error;

use crate::response::HttpResponse;

/// Errors that can occur when serving static files.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The requested file was not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path is refused (traversal, hidden file, escaping symlink).
    #[error("forbidden path: {0}")]
    Forbidden(String),

    /// I/O error while reading file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StaticFileError> for AppError {
    fn from(err: StaticFileError) -> Self {
        match err {
            StaticFileError::NotFound(path) => AppError::not_found_resource("static file", path),
            StaticFileError::Forbidden(reason) => AppError::rejected(StatusCode::FORBIDDEN, reason),
            StaticFileError::Io(source) => {
                AppError::internal_with_source("failed to read static file", source)
            }
        }
    }
}

/// Static file server for one root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    cache_control: Option<String>,
}

impl StaticFiles {
    /// Creates a static file server for the given root directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache_control: None,
        }
    }

    /// Sets the `Cache-Control` value sent with every file.
    #[must_use]
    pub fn cache_control<S: Into<String>>(mut self, value: S) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves `request_path`, relative to the root.
    ///
    /// `HEAD` gets the `GET` headers with an empty body. The router only
    /// sends `GET` and `HEAD` here.
    pub fn handle(
        &self,
        request_path: &str,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<HttpResponse, StaticFileError> {
        let path = self.resolve_path(request_path)?;
        if !path.is_file() {
            return Err(StaticFileError::NotFound(request_path.to_string()));
        }
        self.serve_file(&path, headers, method)
    }

    /// Maps a request path onto the filesystem, refusing anything that
    /// could leave the root.
    fn resolve_path(&self, request_path: &str) -> Result<PathBuf, StaticFileError> {
        let relative = request_path.trim_start_matches('/');

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => {
                    if name.to_str().map_or(true, |n| n.starts_with('.')) {
                        return Err(StaticFileError::Forbidden(
                            "hidden files are not served".to_string(),
                        ));
                    }
                }
                Component::CurDir => {}
                _ => {
                    return Err(StaticFileError::Forbidden(
                        "directory traversal not allowed".to_string(),
                    ))
                }
            }
        }

        let full_path = self.root.join(relative);
        let canonical = full_path
            .canonicalize()
            .map_err(|_| StaticFileError::NotFound(request_path.to_string()))?;
        let canonical_root = self.root.canonicalize()?;

        if !canonical.starts_with(&canonical_root) {
            return Err(StaticFileError::Forbidden(
                "path escapes root directory".to_string(),
            ));
        }

        Ok(canonical)
    }

    fn serve_file(
        &self,
        path: &Path,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<HttpResponse, StaticFileError> {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata.modified().ok();
        let etag = modified.and_then(|m| etag(m, metadata.len()));

        if is_fresh(headers, etag.as_deref(), modified) {
            return Ok(self.not_modified(etag.as_deref()));
        }

        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(std::fs::read(path)?)
        };

        let mut response = Response::new(Full::new(body));
        let out = response.headers_mut();
        out.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime_type(path)));
        out.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        if let Some(modified) = modified {
            if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
                out.insert(header::LAST_MODIFIED, value);
            }
        }
        self.common_headers(out, etag.as_deref());
        Ok(response)
    }

    fn not_modified(&self, etag: Option<&str>) -> HttpResponse {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        self.common_headers(response.headers_mut(), etag);
        response
    }

    fn common_headers(&self, headers: &mut HeaderMap, etag: Option<&str>) {
        if let Some(value) = etag.and_then(|e| HeaderValue::from_str(e).ok()) {
            headers.insert(header::ETAG, value);
        }
        if let Some(value) = self
            .cache_control
            .as_deref()
            .and_then(|c| HeaderValue::from_str(c).ok())
        {
            headers.insert(header::CACHE_CONTROL, value);
        }
    }
}

/// Weak validator from modification time and size.
fn etag(modified: SystemTime, len: u64) -> Option<String> {
    let since_epoch = modified.duration_since(SystemTime::UNIX_EPOCH).ok()?;
    Some(format!("\"{:x}-{:x}\"", since_epoch.as_secs(), len))
}

/// `If-None-Match` takes precedence over `If-Modified-Since`.
fn is_fresh(headers: &HeaderMap, etag: Option<&str>, modified: Option<SystemTime>) -> bool {
    if let Some(value) = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok()) {
        return etag.is_some_and(|etag| {
            value.trim() == "*" || value.split(',').any(|candidate| candidate.trim() == etag)
        });
    }

    let since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok());

    match (modified, since) {
        (Some(modified), Some(since)) => {
            let secs = |t: SystemTime| {
                t.duration_since(SystemTime::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or_default()
            };
            secs(modified) <= secs(since)
        }
        _ => false,
    }
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/main.css"), "body { margin: 0; }").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(dir.path().join(".secret"), "hidden").unwrap();
        dir
    }

    fn get(files: &StaticFiles, path: &str) -> Result<HttpResponse, StaticFileError> {
        files.handle(path, &HeaderMap::new(), &Method::GET)
    }

    #[test]
    fn test_serve_css_file() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let response = get(&files, "css/main.css").unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css; charset=utf-8");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "19");
        assert!(response.headers().contains_key(header::ETAG));
        assert!(response.headers().contains_key(header::LAST_MODIFIED));
    }

    #[test]
    fn test_mime_type_detection() {
        assert_eq!(mime_type(Path::new("a.png")), "image/png");
        assert_eq!(mime_type(Path::new("a.JS")), "text/javascript; charset=utf-8");
        assert_eq!(mime_type(Path::new("a.bin")), "application/octet-stream");
    }

    #[test]
    fn test_head_request_has_no_body() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let response = files
            .handle("/css/main.css", &HeaderMap::new(), &Method::HEAD)
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "19");
        let body = tokio_test::block_on(http_body_util::BodyExt::collect(response.into_body()))
            .unwrap()
            .to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_directory_traversal_blocked() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path().join("css"));

        let err = get(&files, "../logo.png").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_hidden_files_blocked() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = get(&files, ".secret").unwrap_err();
        assert!(matches!(err, StaticFileError::Forbidden(_)));
    }

    #[test]
    fn test_directories_are_not_listed() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        assert!(matches!(get(&files, "css"), Err(StaticFileError::NotFound(_))));
    }

    #[test]
    fn test_file_not_found() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let err = get(&files, "missing.js").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let app: AppError = err.into();
        assert_eq!(app.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_if_none_match_returns_304() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path()).cache_control("max-age=60");

        let first = get(&files, "logo.png").unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, etag);
        let second = files.handle("logo.png", &headers, &Method::GET).unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(second.headers()[header::CACHE_CONTROL], "max-age=60");
    }

    #[test]
    fn test_if_modified_since_returns_304() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let first = get(&files, "logo.png").unwrap();
        let last_modified = first.headers()[header::LAST_MODIFIED].clone();

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_MODIFIED_SINCE, last_modified);
        let second = files.handle("logo.png", &headers, &Method::GET).unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_stale_etag_serves_file() {
        let dir = create_test_dir();
        let files = StaticFiles::new(dir.path());

        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"stale\""));
        let response = files.handle("logo.png", &headers, &Method::GET).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
