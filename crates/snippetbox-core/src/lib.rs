//! # Snippetbox Core
//!
//! Core types shared by every Snippetbox crate:
//!
//! - [`AppError`] - The error taxonomy handlers return and the Error Reporter consumes
//! - [`RequestInfo`] - Method and URI captured for server-fault diagnostics
//! - [`Snippet`] / [`SnippetStore`] - The stored entity and its persistence seam
//! - [`TemplateData`] - Per-request template payload

#![doc(html_root_url = "https://docs.rs/snippetbox-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod data;
mod error;
pub mod snippet;

pub use context::RequestInfo;
pub use data::TemplateData;
pub use error::{AppError, AppResult, ErrorCategory, FieldErrors};
pub use snippet::{MemoryStore, Snippet, SnippetStore, StoreError};
