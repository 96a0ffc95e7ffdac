//! Route handlers.
//!
//! Every handler returns [`AppResult`]; an `Err` is handed to the
//! [`ErrorReporter`](crate::ErrorReporter) by [`Application`].

use http::StatusCode;
use serde::{Deserialize, Serialize};
use snippetbox_core::{AppError, AppResult, FieldErrors, TemplateData};
use snippetbox_extract::{path_id, ExtractionContext};

use crate::response::{self, HttpResponse};
use crate::Application;

/// Number of snippets listed on the home page.
pub const LATEST_LIMIT: usize = 10;

/// Expiry preselected on the create form, in days.
pub const DEFAULT_EXPIRES_DAYS: u32 = 365;

/// Expiry choices the create form offers, in days.
pub const PERMITTED_EXPIRES: [u32; 3] = [1, 7, 365];

/// Longest accepted title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Submitted create-snippet form, echoed back on validation failure.
///
/// Absent fields decode to their defaults so that an empty submission gets
/// field feedback rather than a bare 400.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCreateForm {
    /// Snippet title.
    #[serde(default)]
    pub title: String,
    /// Snippet body.
    #[serde(default)]
    pub content: String,
    /// Days until expiry.
    #[serde(default)]
    pub expires: u32,
    /// Validation feedback per field.
    #[serde(skip_deserializing)]
    pub field_errors: FieldErrors,
}

impl SnippetCreateForm {
    /// Checks the form and records feedback in `field_errors`.
    ///
    /// Returns `true` when the form is acceptable.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::new();
        errors.check(!self.title.trim().is_empty(), "title", "This field cannot be blank");
        errors.check(
            self.title.chars().count() <= MAX_TITLE_CHARS,
            "title",
            "This field cannot be more than 100 characters long",
        );
        errors.check(!self.content.trim().is_empty(), "content", "This field cannot be blank");
        errors.check(
            PERMITTED_EXPIRES.contains(&self.expires),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        self.field_errors = errors;
        self.field_errors.is_empty()
    }
}

/// `GET /`: the latest snippets.
pub async fn home(app: &Application, ctx: &ExtractionContext) -> AppResult<HttpResponse> {
    let snippets = app.store().latest(LATEST_LIMIT).await?;
    let data = TemplateData::new().with_snippets(snippets);
    Ok(app.render(&ctx.request_info(), StatusCode::OK, "home", &data))
}

/// `GET /snippet/view/{id}`: one snippet.
pub async fn snippet_view(app: &Application, ctx: &ExtractionContext) -> AppResult<HttpResponse> {
    let id = path_id(ctx, "id")?;
    let snippet = app.store().get(id).await?;
    let data = TemplateData::new().with_snippet(snippet);
    Ok(app.render(&ctx.request_info(), StatusCode::OK, "view", &data))
}

/// `GET /snippet/create`: the empty create form.
pub async fn snippet_create(app: &Application, ctx: &ExtractionContext) -> AppResult<HttpResponse> {
    let form = SnippetCreateForm {
        expires: DEFAULT_EXPIRES_DAYS,
        ..SnippetCreateForm::default()
    };
    let data = TemplateData::new().with_form(&form)?;
    Ok(app.render(&ctx.request_info(), StatusCode::OK, "create", &data))
}

/// `POST /snippet/create`: store a snippet and redirect to it.
///
/// Undecodable input is a 400. Decoded input that fails validation
/// re-renders the form with a 422.
pub async fn snippet_create_post(
    app: &Application,
    ctx: &ExtractionContext,
) -> AppResult<HttpResponse> {
    ctx.require_content_type(FORM_URLENCODED)?;

    let mut form = SnippetCreateForm::default();
    app.decoder().decode_into(ctx.body(), &mut form)?;

    if !form.validate() {
        let data = TemplateData::new().with_form(&form)?;
        return Ok(app.render(
            &ctx.request_info(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "create",
            &data,
        ));
    }

    let id = app.store().insert(&form.title, &form.content, form.expires).await?;
    Ok(response::see_other(&format!("/snippet/view/{id}")))
}

/// `GET|HEAD /static/{*path}`: a file below the static root.
pub fn static_file(app: &Application, ctx: &ExtractionContext) -> AppResult<HttpResponse> {
    let files = app
        .static_files()
        .ok_or_else(|| AppError::not_found("static files are not served"))?;
    let path = ctx
        .path_params()
        .get("path")
        .ok_or_else(|| AppError::not_found("no static path"))?;
    Ok(files.handle(path, ctx.headers(), ctx.method())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str, expires: u32) -> SnippetCreateForm {
        SnippetCreateForm {
            title: title.to_string(),
            content: content.to_string(),
            expires,
            ..SnippetCreateForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let mut f = form("O snail", "Climb Mount Fuji,\nBut slowly, slowly!", 7);
        assert!(f.validate());
        assert!(f.field_errors.is_empty());
    }

    #[test]
    fn test_blank_fields() {
        let mut f = form("   ", "", 365);
        assert!(!f.validate());
        assert_eq!(f.field_errors.first("title"), Some("This field cannot be blank"));
        assert_eq!(f.field_errors.first("content"), Some("This field cannot be blank"));
        assert_eq!(f.field_errors.first("expires"), None);
    }

    #[test]
    fn test_title_length_counts_characters() {
        let mut at_limit = form(&"é".repeat(MAX_TITLE_CHARS), "body", 1);
        assert!(at_limit.validate());

        let mut over = form(&"a".repeat(MAX_TITLE_CHARS + 1), "body", 1);
        assert!(!over.validate());
        assert!(over.field_errors.first("title").unwrap().contains("100 characters"));
    }

    #[test]
    fn test_expires_must_be_permitted() {
        let mut f = form("title", "body", 30);
        assert!(!f.validate());
        assert_eq!(f.field_errors.len(), 1);
        assert!(f.field_errors.first("expires").is_some());
    }

    #[test]
    fn test_field_errors_are_not_decoded() {
        let decoded: SnippetCreateForm = snippetbox_extract::FormDecoder::strict()
            .decode(b"title=a&content=b&expires=7")
            .unwrap();
        assert_eq!(decoded, form("a", "b", 7));

        let smuggled = snippetbox_extract::FormDecoder::strict()
            .decode::<SnippetCreateForm>(b"title=a&field_errors=x");
        assert!(smuggled.is_err());
    }
}
