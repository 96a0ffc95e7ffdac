//! Request routing and path matching.
//!
//! The router maps method + path to a route target and extracts path
//! parameters. Patterns are matched segment by segment:
//!
//! - `/` matches only the root path
//! - `{name}` matches exactly one non-empty segment
//! - a trailing `{*name}` matches the non-empty remainder of the path
//!
//! A path that matches a pattern registered only for other methods yields
//! [`RouteOutcome::MethodNotAllowed`] with the methods that would match.
//!
//! # Example
//!
//! ```rust
//! use snippetbox_server::{Router, RouteOutcome};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/snippet/view/{id}", "view");
//! router.add_route(Method::POST, "/snippet/create", "create");
//!
//! match router.match_route(&Method::GET, "/snippet/view/3") {
//!     RouteOutcome::Matched { target, params } => {
//!         assert_eq!(target, "view");
//!         assert_eq!(params.get("id"), Some("3"));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//!
//! assert!(matches!(
//!     router.match_route(&Method::GET, "/snippet/create"),
//!     RouteOutcome::MethodNotAllowed { .. }
//! ));
//! ```

use http::Method;
use snippetbox_extract::Params;

/// Result of matching a request against the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome<T> {
    /// A route matched method and path.
    Matched {
        /// The route's target.
        target: T,
        /// Extracted path parameters.
        params: Params,
    },

    /// The path matched, but not for this method.
    MethodNotAllowed {
        /// Methods registered for the path, in registration order.
        allow: Vec<Method>,
    },

    /// No route matched the path.
    NotFound,
}

/// A segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// A literal segment (e.g., "snippet")
    Literal(String),

    /// A parameter segment (e.g., "{id}")
    Param(String),

    /// A trailing catch-all (e.g., "{*path}")
    Rest(String),
}

#[derive(Debug, Clone)]
struct Route<T> {
    method: Method,
    segments: Vec<PathSegment>,
    target: T,
}

impl<T> Route<T> {
    fn new(method: Method, pattern: &str, target: T) -> Self {
        Self {
            method,
            segments: parse_segments(pattern),
            target,
        }
    }

    /// Attempts to match this route against a path.
    fn match_path(&self, path: &str) -> Option<Params> {
        let mut actual = path.strip_prefix('/')?.split('/');
        let mut params = Params::new();

        for (index, pattern) in self.segments.iter().enumerate() {
            match pattern {
                PathSegment::Rest(name) => {
                    let rest = actual.by_ref().collect::<Vec<_>>().join("/");
                    if rest.is_empty() || index + 1 != self.segments.len() {
                        return None;
                    }
                    params.push(name.as_str(), rest);
                    return Some(params);
                }
                PathSegment::Literal(expected) => {
                    if actual.next()? != expected {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    let value = actual.next().filter(|v| !v.is_empty())?;
                    params.push(name.as_str(), value);
                }
            }
        }

        actual.next().is_none().then_some(params)
    }
}

/// Parses a path pattern into segments. `/` parses to one empty literal.
fn parse_segments(pattern: &str) -> Vec<PathSegment> {
    pattern
        .strip_prefix('/')
        .unwrap_or(pattern)
        .split('/')
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => match name.strip_prefix('*') {
                Some(rest) => PathSegment::Rest(rest.to_string()),
                None => PathSegment::Param(name.to_string()),
            },
            None => PathSegment::Literal(s.to_string()),
        })
        .collect()
}

/// HTTP request router.
///
/// Routes are checked in registration order; the first match wins.
#[derive(Debug, Clone)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<T: Clone> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route to the router.
    pub fn add_route(&mut self, method: Method, pattern: impl AsRef<str>, target: T) {
        self.routes.push(Route::new(method, pattern.as_ref(), target));
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches a request to a route.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> RouteOutcome<T> {
        let mut allow = Vec::new();

        for route in &self.routes {
            let Some(params) = route.match_path(path) else {
                continue;
            };
            if route.method == *method {
                return RouteOutcome::Matched {
                    target: route.target.clone(),
                    params,
                };
            }
            if !allow.contains(&route.method) {
                allow.push(route.method.clone());
            }
        }

        if allow.is_empty() {
            RouteOutcome::NotFound
        } else {
            RouteOutcome::MethodNotAllowed { allow }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router<&'static str> {
        let mut router = Router::new();
        router.add_route(Method::GET, "/", "home");
        router.add_route(Method::GET, "/snippet/view/{id}", "view");
        router.add_route(Method::GET, "/snippet/create", "create");
        router.add_route(Method::POST, "/snippet/create", "create_post");
        router.add_route(Method::GET, "/static/{*path}", "static");
        router.add_route(Method::HEAD, "/static/{*path}", "static");
        router
    }

    fn target(outcome: RouteOutcome<&'static str>) -> Option<&'static str> {
        match outcome {
            RouteOutcome::Matched { target, .. } => Some(target),
            _ => None,
        }
    }

    #[test]
    fn test_root_is_exact() {
        let router = router();
        assert_eq!(target(router.match_route(&Method::GET, "/")), Some("home"));
        assert_eq!(router.match_route(&Method::GET, "/missing"), RouteOutcome::NotFound);
        assert_eq!(router.match_route(&Method::GET, "//"), RouteOutcome::NotFound);
    }

    #[test]
    fn test_param_extraction() {
        let router = router();
        match router.match_route(&Method::GET, "/snippet/view/42") {
            RouteOutcome::Matched { target, params } => {
                assert_eq!(target, "view");
                assert_eq!(params.get("id"), Some("42"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_param_must_be_non_empty_and_single_segment() {
        let router = router();
        assert_eq!(router.match_route(&Method::GET, "/snippet/view/"), RouteOutcome::NotFound);
        assert_eq!(router.match_route(&Method::GET, "/snippet/view/1/2"), RouteOutcome::NotFound);
        assert_eq!(router.match_route(&Method::GET, "/snippet/view/1/"), RouteOutcome::NotFound);
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let router = router();
        assert_eq!(
            router.match_route(&Method::DELETE, "/snippet/create"),
            RouteOutcome::MethodNotAllowed {
                allow: vec![Method::GET, Method::POST]
            }
        );
    }

    #[test]
    fn test_rest_captures_remainder() {
        let router = router();
        match router.match_route(&Method::HEAD, "/static/css/main.css") {
            RouteOutcome::Matched { target, params } => {
                assert_eq!(target, "static");
                assert_eq!(params.get("path"), Some("css/main.css"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(router.match_route(&Method::GET, "/static/"), RouteOutcome::NotFound);
    }

    #[test]
    fn test_route_count() {
        assert_eq!(router().route_count(), 6);
        assert_eq!(Router::<u8>::new().route_count(), 0);
    }
}
