//! Path parameters.
//!
//! The router stores the values captured by `{name}` segments in [`Params`];
//! handlers read them back with [`path_param`].

use crate::{ExtractionContext, ExtractionError, ExtractionSource};
use std::str::FromStr;

/// Path parameters captured by a route match, in pattern order.
///
/// # Example
///
/// ```rust
/// use snippetbox_extract::Params;
///
/// let mut params = Params::new();
/// params.push("id", "7");
///
/// assert_eq!(params.get("id"), Some("7"));
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: Vec<(String, String)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value of a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Extract a single path parameter by name.
///
/// # Example
///
/// ```rust
/// use snippetbox_extract::{path_param, ExtractionContext, Params};
/// use http::{Method, Uri, HeaderMap};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "42");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/snippet/view/42"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// let id: i64 = path_param(&ctx, "id").unwrap();
/// assert_eq!(id, 42);
/// ```
///
/// # Errors
///
/// Returns an error if the parameter is missing or cannot be parsed.
pub fn path_param<T: FromStr>(ctx: &ExtractionContext, name: &str) -> Result<T, ExtractionError> {
    let value = ctx
        .path_params()
        .get(name)
        .ok_or_else(|| ExtractionError::missing(ExtractionSource::Path, name))?;

    value.parse().map_err(|_| {
        ExtractionError::invalid_type(
            ExtractionSource::Path,
            name,
            format!("failed to parse as {}", std::any::type_name::<T>()),
        )
    })
}

/// Extract a positive integer id from the path.
///
/// Zero and negative values are rejected like unparsable ones.
pub fn path_id(ctx: &ExtractionContext, name: &str) -> Result<i64, ExtractionError> {
    let id: i64 = path_param(ctx, name)?;
    if id < 1 {
        return Err(ExtractionError::invalid_type(
            ExtractionSource::Path,
            name,
            "must be a positive integer",
        ));
    }
    Ok(id)
}
