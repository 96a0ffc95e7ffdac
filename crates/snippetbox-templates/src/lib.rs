//! # Snippetbox Templates
//!
//! The template cache and buffered page execution.
//!
//! - [`TemplateCache::build`] reads a template directory once at startup and
//!   compiles one [`TemplateSet`] per page (base + partials + page).
//! - [`TemplateCache::execute`] renders a page into a buffer; the caller
//!   commits status and body only when it succeeds.
//!
//! Templates use the Tera grammar. Every page starts with
//! `{% extends "base.html" %}` and fills the blocks the base declares.

#![doc(html_root_url = "https://docs.rs/snippetbox-templates/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod error;
pub mod filters;

pub use cache::{TemplateCache, TemplateSet, TemplateSources, BASE_TEMPLATE, PAGES_DIR, PARTIALS_DIR};
pub use error::TemplateError;
pub use tera::Context;
