//! Template error types.

use snippetbox_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from building the template cache or executing a page.
///
/// Build errors (everything except [`PageNotFound`](Self::PageNotFound) and
/// [`Render`](Self::Render)) are fatal at startup.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A template file or directory could not be read.
    #[error("failed to read template path {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The base layout does not exist.
    #[error("base layout not found at {0}")]
    MissingBase(PathBuf),

    /// A template file name is not valid UTF-8, so it cannot name a page.
    #[error("template file name {0} is not valid UTF-8")]
    InvalidFileName(PathBuf),

    /// A page does not extend the base layout.
    #[error("page '{page}' must start with {{% extends \"base.html\" %}}")]
    NotExtendingBase {
        /// Page name.
        page: String,
    },

    /// A page, partial or the base includes a template the set does not hold.
    #[error("page '{page}' includes unknown template '{include}'")]
    MissingInclude {
        /// Page whose set was being compiled.
        page: String,
        /// Name of the missing template.
        include: String,
    },

    /// The template engine rejected a page's composition.
    #[error("failed to compile page '{page}'")]
    Compile {
        /// Page name.
        page: String,
        /// Engine error.
        #[source]
        source: tera::Error,
    },

    /// The page is not in the cache.
    #[error("the template '{0}' does not exist")]
    PageNotFound(String),

    /// Executing a compiled page failed.
    #[error("failed to render page '{page}'")]
    Render {
        /// Page name.
        page: String,
        /// Engine error.
        #[source]
        source: tera::Error,
    },
}

impl TemplateError {
    /// Returns the page the error concerns, if any.
    #[must_use]
    pub fn page(&self) -> Option<&str> {
        match self {
            Self::NotExtendingBase { page }
            | Self::MissingInclude { page, .. }
            | Self::Compile { page, .. }
            | Self::Render { page, .. } => Some(page),
            Self::PageNotFound(page) => Some(page),
            Self::Io { .. } | Self::MissingBase(_) | Self::InvalidFileName(_) => None,
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::PageNotFound(page) => AppError::template_missing(page),
            other => AppError::internal_with_source("template execution failed", other),
        }
    }
}
