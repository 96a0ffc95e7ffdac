//! Extraction error types.
//!
//! [`ExtractionError`] covers everything about a request except the form body
//! itself: path parameters, headers, body size. Form decoding has its own
//! taxonomy in [`crate::form`].

use http::StatusCode;
use snippetbox_core::AppError;
use std::fmt;

/// Source of extraction (where data was being extracted from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path parameters (e.g., `/snippet/view/{id}`)
    Path,
    /// Request body
    Body,
    /// HTTP headers
    Header,
    /// Content-Type header specifically
    ContentType,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Body => write!(f, "body"),
            Self::Header => write!(f, "header"),
            Self::ContentType => write!(f, "content-type"),
        }
    }
}

/// Error that occurs during extraction.
///
/// # Example
///
/// ```rust
/// use snippetbox_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::missing(ExtractionSource::Header, "content-type");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Header);
/// assert!(err.to_string().contains("content-type"));
///
/// // A bad path parameter names no resource.
/// let err = ExtractionError::missing(ExtractionSource::Path, "id");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    field: Option<String>,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    Missing,
    InvalidType,
    PayloadTooLarge,
    UnsupportedMediaType,
}

impl ExtractionError {
    /// Creates an error for a missing field or parameter.
    #[must_use]
    pub fn missing(source: ExtractionSource, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::Missing,
            message: format!("missing required {source} parameter: {field}"),
            field: Some(field),
        }
    }

    /// Creates an error for an invalid type or format.
    #[must_use]
    pub fn invalid_type(
        source: ExtractionSource,
        field: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::InvalidType,
            message: format!("invalid {source} parameter '{field}': {details}"),
            field: Some(field),
        }
    }

    /// Creates an error for a body over the size limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
            field: None,
        }
    }

    /// Creates an error for a streamed body cut off at the size limit.
    #[must_use]
    pub fn body_over_limit(max_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: body exceeds {max_size} bytes"),
            field: None,
        }
    }

    /// Creates an error for an unsupported content type.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual_str = actual.unwrap_or("none");
        Self {
            extraction_source: ExtractionSource::ContentType,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!(
                "unsupported content type: expected '{expected}', got '{actual_str}'"
            ),
            field: None,
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the HTTP status code for this error.
    ///
    /// A malformed path parameter is answered as 404: the path names no
    /// resource that could exist.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match (self.kind, self.extraction_source) {
            (ExtractionErrorKind::Missing | ExtractionErrorKind::InvalidType, ExtractionSource::Path) => {
                StatusCode::NOT_FOUND
            }
            (ExtractionErrorKind::Missing | ExtractionErrorKind::InvalidType, _) => {
                StatusCode::BAD_REQUEST
            }
            (ExtractionErrorKind::PayloadTooLarge, _) => StatusCode::PAYLOAD_TOO_LARGE,
            (ExtractionErrorKind::UnsupportedMediaType, _) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        let status = err.status_code();
        if status == StatusCode::NOT_FOUND {
            AppError::not_found(err.message)
        } else {
            AppError::rejected(status, err.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_error() {
        let err = ExtractionError::missing(ExtractionSource::Header, "content-type");

        assert_eq!(err.extraction_source(), ExtractionSource::Header);
        assert_eq!(err.field(), Some("content-type"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_path_errors_are_not_found() {
        let err = ExtractionError::invalid_type(ExtractionSource::Path, "id", "expected integer");

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("expected integer"));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_missing_path_parameter_is_not_found() {
        let err = ExtractionError::missing(ExtractionSource::Path, "id");

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.field(), Some("id"));
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = ExtractionError::payload_too_large(1024, 2048);

        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("1024"));

        let streamed = ExtractionError::body_over_limit(1024);
        assert_eq!(streamed.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("2048"));

        let app: AppError = err.into();
        assert_eq!(app.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!app.is_server_fault());
    }

    #[test]
    fn test_unsupported_media_type_error() {
        let err = ExtractionError::unsupported_media_type(
            "application/x-www-form-urlencoded",
            Some("application/json"),
        );

        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("application/json"));
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Path.to_string(), "path");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::Header.to_string(), "header");
        assert_eq!(ExtractionSource::ContentType.to_string(), "content-type");
    }
}
