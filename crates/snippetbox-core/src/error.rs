//! Error types for Snippetbox.
//!
//! This module provides the [`AppError`] type, the error value every handler
//! returns and the Error Reporter consumes.
//!
//! # Taxonomy
//!
//! | `ErrorCategory` | Status | Logged | Client sees |
//! |---|---|---|---|
//! | `Validation` | 422 | no | field-level feedback |
//! | `BadRequest` | 400 (or the rejection's 4xx) | no | standard reason text |
//! | `NotFound` | 404 | no | standard reason text |
//! | `Internal` | 500 | yes, with stack | generic reason text |
//! | `Fault` | 500 | yes, with stack | generic reason text |
//!
//! `Fault` marks a programming-contract violation (for example handing the
//! form decoder a destination it cannot populate). It has no conversion into
//! a client-facing message.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias using [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// User input decoded but failed domain validation.
    Validation,
    /// User input could not be decoded at all.
    BadRequest,
    /// Resource not found.
    NotFound,
    /// Internal server errors (store failures, render failures, missing templates).
    Internal,
    /// Programming-contract violation.
    Fault,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal | Self::Fault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for categories that are server-side faults.
    ///
    /// Server faults are logged with full diagnostic context and always
    /// answered with a generic message.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        matches!(self, Self::Internal | Self::Fault)
    }
}

/// Standard error type for Snippetbox.
///
/// # Example
///
/// ```
/// use snippetbox_core::{AppError, ErrorCategory};
///
/// let err = AppError::template_missing("home");
/// assert_eq!(err.category(), ErrorCategory::Internal);
/// assert!(err.to_string().contains("home"));
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Submitted data decoded but failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
        /// Field-specific validation errors.
        #[source]
        field_errors: FieldErrors,
    },

    /// Submitted data could not be decoded.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// The request was refused before decoding with a specific 4xx status.
    #[error("Rejected ({status}): {message}")]
    Rejected {
        /// Status to answer with.
        status: StatusCode,
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
        /// The type of resource that was not found.
        resource_type: Option<String>,
        /// The identifier of the resource.
        resource_id: Option<String>,
    },

    /// A page was requested that the template cache does not hold.
    #[error("Template missing: page '{page}' is not in the template cache")]
    TemplateMissing {
        /// The page name that was looked up.
        page: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Programming-contract violation.
    #[error("Contract fault: {message}")]
    Fault {
        /// Description of the violated contract.
        message: String,
    },
}

impl AppError {
    /// Creates a validation error with field-specific errors.
    #[must_use]
    pub fn validation(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors,
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a rejection carrying its own client-error status.
    ///
    /// A status outside the 4xx range is treated as a 400.
    #[must_use]
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.is_client_error() {
            status
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
            resource_id: None,
        }
    }

    /// Creates a not found error with resource context.
    #[must_use]
    pub fn not_found_resource(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_id = resource_id.into();
        Self::NotFound {
            message: format!("{resource_type} with ID '{resource_id}' not found"),
            resource_type: Some(resource_type),
            resource_id: Some(resource_id),
        }
    }

    /// Creates a template-missing error.
    #[must_use]
    pub fn template_missing(page: impl Into<String>) -> Self {
        Self::TemplateMissing { page: page.into() }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates a contract fault.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::BadRequest { .. } | Self::Rejected { .. } => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateMissing { .. } | Self::Internal { .. } => ErrorCategory::Internal,
            Self::Fault { .. } => ErrorCategory::Fault,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => *status,
            _ => self.category().default_status_code(),
        }
    }

    /// Returns `true` if this error must go through the server-fault path.
    #[must_use]
    pub const fn is_server_fault(&self) -> bool {
        self.category().is_server_fault()
    }

    /// Returns the field errors of a validation error.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    /// Renders the full cause chain, outermost first.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// Field-specific validation errors.
///
/// Serializes as a plain map so templates can write
/// `{% if field_errors.title %}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("Field validation errors")]
pub struct FieldErrors {
    /// Map of field name to list of error messages.
    pub fields: HashMap<String, Vec<String>>,
}

impl FieldErrors {
    /// Creates a new empty `FieldErrors`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Adds `message` for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Returns the first message recorded for a field.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns `true` if there are no field errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let mut fields = FieldErrors::new();
        fields.add("title", "This field cannot be blank");

        let error = AppError::validation("invalid snippet", fields);
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            error.field_errors().and_then(|f| f.first("title")),
            Some("This field cannot be blank")
        );
        assert!(!error.is_server_fault());
    }

    #[test]
    fn test_not_found_resource() {
        let error = AppError::not_found_resource("snippet", "42");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert!(error.to_string().contains("42"));
    }

    #[test]
    fn test_rejected_keeps_client_status() {
        let error = AppError::rejected(StatusCode::PAYLOAD_TOO_LARGE, "form too large");
        assert_eq!(error.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(error.category(), ErrorCategory::BadRequest);

        let coerced = AppError::rejected(StatusCode::OK, "not an error status");
        assert_eq!(coerced.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_template_missing_is_server_fault() {
        let error = AppError::template_missing("missing");
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.is_server_fault());
    }

    #[test]
    fn test_fault_is_never_a_client_error() {
        let error = AppError::fault("destination is not a struct");
        assert_eq!(error.category(), ErrorCategory::Fault);
        assert!(error.status_code().is_server_error());
        assert!(error.field_errors().is_none());
    }

    #[test]
    fn test_chain_includes_source() {
        let io = std::io::Error::other("disk on fire");
        let error = AppError::internal_with_source("store failed", io);
        let chain = error.chain();
        assert!(chain.contains("store failed"));
        assert!(chain.contains("disk on fire"));
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.add("content", "This field cannot be blank");
        errors.check(true, "title", "unused");
        errors.check(false, "expires", "This field must equal 1, 7 or 365");

        assert_eq!(errors.len(), 2);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["content"][0], "This field cannot be blank");
        assert!(json.get("title").is_none());
    }

    #[test]
    fn test_all_error_categories_have_status_codes() {
        let categories = [
            ErrorCategory::Validation,
            ErrorCategory::BadRequest,
            ErrorCategory::NotFound,
            ErrorCategory::Internal,
            ErrorCategory::Fault,
        ];

        for category in categories {
            let status = category.default_status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Category {:?} should map to error status code, got {}",
                category,
                status
            );
            assert_eq!(category.is_server_fault(), status.is_server_error());
        }
    }
}
