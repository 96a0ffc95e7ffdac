//! The template data payload.

use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::{AppError, AppResult, Snippet};

/// Values a page template may reference.
///
/// Built fresh by each handler and owned by a single request. Every field is
/// always present in the render context so templates can test it without
/// tripping the undefined-variable check.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    /// Calendar year shown in the footer.
    pub current_year: i32,
    /// Snippet shown on the view page.
    pub snippet: Option<Snippet>,
    /// Snippets listed on the home page.
    pub snippets: Vec<Snippet>,
    /// Echo of a submitted form, including its field errors.
    pub form: serde_json::Value,
}

impl Default for TemplateData {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateData {
    /// Creates a payload stamped with the current year.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
            snippet: None,
            snippets: Vec::new(),
            form: serde_json::Value::Null,
        }
    }

    /// Sets the snippet for the view page.
    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    /// Sets the snippet listing.
    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    /// Sets the form echo.
    pub fn with_form<F: Serialize>(mut self, form: &F) -> AppResult<Self> {
        self.form = serde_json::to_value(form)
            .map_err(|e| AppError::internal_with_source("form echo not serializable", e))?;
        Ok(self)
    }
}
