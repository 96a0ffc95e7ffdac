//! The application context.
//!
//! [`Application`] is built once at startup and shared by every request. It
//! owns the template cache, the snippet store, the form decoder and the
//! routing table; nothing here is global.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, StatusCode};
use snippetbox_core::{RequestInfo, SnippetStore, TemplateData};
use snippetbox_extract::{ExtractionContext, FormDecoder};
use snippetbox_templates::TemplateCache;

use crate::handlers;
use crate::middleware;
use crate::response::{self, HttpResponse};
use crate::router::{RouteOutcome, Router};
use crate::static_files::StaticFiles;
use crate::ErrorReporter;

/// Route targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /`
    Home,
    /// `GET /snippet/view/{id}`
    SnippetView,
    /// `GET /snippet/create`
    SnippetCreate,
    /// `POST /snippet/create`
    SnippetCreatePost,
    /// `GET|HEAD /static/{*path}`
    Static,
}

/// Shared state handed to every handler.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use snippetbox_core::MemoryStore;
/// use snippetbox_server::Application;
/// use snippetbox_templates::TemplateCache;
///
/// let app = Application::new(Arc::new(TemplateCache::default()), Arc::new(MemoryStore::new()));
/// assert!(app.static_files().is_none());
/// ```
pub struct Application {
    templates: Arc<TemplateCache>,
    store: Arc<dyn SnippetStore>,
    decoder: FormDecoder,
    reporter: ErrorReporter,
    static_files: Option<StaticFiles>,
    router: Router<Route>,
}

impl Application {
    /// Creates an application serving the snippet routes.
    #[must_use]
    pub fn new(templates: Arc<TemplateCache>, store: Arc<dyn SnippetStore>) -> Self {
        let mut router = Router::new();
        router.add_route(Method::GET, "/", Route::Home);
        router.add_route(Method::GET, "/snippet/view/{id}", Route::SnippetView);
        router.add_route(Method::GET, "/snippet/create", Route::SnippetCreate);
        router.add_route(Method::POST, "/snippet/create", Route::SnippetCreatePost);

        Self {
            templates,
            store,
            decoder: FormDecoder::new(),
            reporter: ErrorReporter::new(),
            static_files: None,
            router,
        }
    }

    /// Serves `files` under `/static/`.
    #[must_use]
    pub fn with_static_files(mut self, files: StaticFiles) -> Self {
        if self.static_files.is_none() {
            self.router.add_route(Method::GET, "/static/{*path}", Route::Static);
            self.router.add_route(Method::HEAD, "/static/{*path}", Route::Static);
        }
        self.static_files = Some(files);
        self
    }

    /// Replaces the form decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: FormDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Returns the template cache.
    #[must_use]
    pub fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    /// Returns the snippet store.
    #[must_use]
    pub fn store(&self) -> &dyn SnippetStore {
        self.store.as_ref()
    }

    /// Returns the form decoder.
    #[must_use]
    pub fn decoder(&self) -> &FormDecoder {
        &self.decoder
    }

    /// Returns the error reporter.
    #[must_use]
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Returns the static file server, if enabled.
    #[must_use]
    pub fn static_files(&self) -> Option<&StaticFiles> {
        self.static_files.as_ref()
    }

    /// Renders `page` with `data`.
    ///
    /// The page is executed into a buffer first. Only a complete buffer
    /// becomes a response with `status`; any failure becomes the reporter's
    /// generic 500 and none of the partial output is sent.
    pub fn render(
        &self,
        info: &RequestInfo,
        status: StatusCode,
        page: &str,
        data: &TemplateData,
    ) -> HttpResponse {
        match self.templates.execute(page, data) {
            Ok(body) => response::html(status, body),
            Err(err) => self.reporter.server_error(info, &err.into()),
        }
    }

    /// Routes and answers one request whose body is already collected.
    pub async fn handle(&self, req: Request<Bytes>) -> HttpResponse {
        let (parts, body) = req.into_parts();

        let mut response = match self.router.match_route(&parts.method, parts.uri.path()) {
            RouteOutcome::Matched { target, params } => {
                let ctx = ExtractionContext::new(parts.method, parts.uri, parts.headers, body, params);
                self.dispatch(target, &ctx).await
            }
            RouteOutcome::MethodNotAllowed { allow } => {
                let mut response = self.reporter.client_error(StatusCode::METHOD_NOT_ALLOWED);
                let allow = allow.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
                if let Ok(value) = HeaderValue::from_str(&allow) {
                    response.headers_mut().insert(header::ALLOW, value);
                }
                response
            }
            RouteOutcome::NotFound => self.reporter.client_error(StatusCode::NOT_FOUND),
        };

        middleware::apply_common_headers(response.headers_mut());
        response
    }

    async fn dispatch(&self, route: Route, ctx: &ExtractionContext) -> HttpResponse {
        let result = match route {
            Route::Home => handlers::home(self, ctx).await,
            Route::SnippetView => handlers::snippet_view(self, ctx).await,
            Route::SnippetCreate => handlers::snippet_create(self, ctx).await,
            Route::SnippetCreatePost => handlers::snippet_create_post(self, ctx).await,
            Route::Static => handlers::static_file(self, ctx),
        };
        result.unwrap_or_else(|err| self.reporter.report(&ctx.request_info(), err))
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("pages", &self.templates.pages())
            .field("decoder", &self.decoder)
            .field("static_files", &self.static_files)
            .field("routes", &self.router.route_count())
            .finish_non_exhaustive()
    }
}
