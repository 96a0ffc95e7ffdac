//! The template cache.
//!
//! Layout on disk:
//!
//! ```text
//! <dir>/base.html            the layout every page extends
//! <dir>/partials/*.html      fragments, registered as "partials/<file>"
//! <dir>/pages/*.html         one page each, named by file stem
//! ```
//!
//! Every page gets its own [`TemplateSet`] holding the base, all partials and
//! that one page. Building is all-or-nothing: the first page that fails to
//! compile aborts the build and no cache is returned.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::filters;
use crate::TemplateError;

/// Registered name of the base layout.
pub const BASE_TEMPLATE: &str = "base.html";
/// Directory holding the partials.
pub const PARTIALS_DIR: &str = "partials";
/// Directory holding the pages.
pub const PAGES_DIR: &str = "pages";

const TEMPLATE_EXTENSION: &str = "html";

/// Raw template sources read from a template directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSources {
    /// Base layout source.
    pub base: String,
    /// `(file name, source)` of every partial.
    pub partials: Vec<(String, String)>,
    /// `(page name, source)` of every page.
    pub pages: Vec<(String, String)>,
}

impl TemplateSources {
    /// Reads base, partials and pages from `dir`.
    ///
    /// A missing `partials/` directory means no partials. A missing
    /// `pages/` directory is an error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();

        let base_path = dir.join(BASE_TEMPLATE);
        if !base_path.is_file() {
            return Err(TemplateError::MissingBase(base_path));
        }
        let base = read_file(&base_path)?;

        let partials_dir = dir.join(PARTIALS_DIR);
        let partials = if partials_dir.is_dir() {
            read_html_files(&partials_dir)?
                .into_iter()
                .map(|(stem, src)| (format!("{stem}.{TEMPLATE_EXTENSION}"), src))
                .collect()
        } else {
            Vec::new()
        };

        let pages = read_html_files(&dir.join(PAGES_DIR))?;

        Ok(Self {
            base,
            partials,
            pages,
        })
    }
}

/// The compiled, executable templates for one page.
pub struct TemplateSet {
    page: String,
    entry: String,
    tera: Tera,
}

impl TemplateSet {
    fn compile(page: &str, sources: &TemplateSources, page_src: &str) -> Result<Self, TemplateError> {
        if !extends_base(page_src) {
            return Err(TemplateError::NotExtendingBase {
                page: page.to_string(),
            });
        }

        let entry = format!("{PAGES_DIR}/{page}.{TEMPLATE_EXTENSION}");
        let mut templates = Vec::with_capacity(sources.partials.len() + 2);
        templates.push((BASE_TEMPLATE.to_string(), sources.base.clone()));
        for (file, src) in &sources.partials {
            templates.push((format!("{PARTIALS_DIR}/{file}"), src.clone()));
        }
        templates.push((entry.clone(), page_src.to_string()));

        let names: HashSet<&str> = templates.iter().map(|(name, _)| name.as_str()).collect();
        for (_, src) in &templates {
            if let Some(include) = includes(src).find(|name| !names.contains(name)) {
                return Err(TemplateError::MissingInclude {
                    page: page.to_string(),
                    include: include.to_string(),
                });
            }
        }

        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("human_date", filters::human_date);
        tera.add_raw_templates(templates)
            .map_err(|source| TemplateError::Compile {
                page: page.to_string(),
                source,
            })?;

        Ok(Self {
            page: page.to_string(),
            entry,
            tera,
        })
    }

    /// Returns the page name.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Executes the page into a fresh buffer.
    ///
    /// Nothing is written anywhere else, so a failure part-way leaves no
    /// output behind.
    pub fn execute(&self, context: &Context) -> Result<Vec<u8>, TemplateError> {
        let mut buf = Vec::new();
        self.tera
            .render_to(&self.entry, context, &mut buf)
            .map_err(|source| TemplateError::Render {
                page: self.page.clone(),
                source,
            })?;
        Ok(buf)
    }
}

impl fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateSet")
            .field("page", &self.page)
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}

/// Immutable map from page name to compiled [`TemplateSet`].
///
/// Built once at startup and only read afterwards; share it behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use snippetbox_templates::{TemplateCache, TemplateSources};
///
/// let sources = TemplateSources {
///     base: r#"<title>{% block title %}{% endblock %}</title>"#.into(),
///     partials: vec![],
///     pages: vec![(
///         "home".into(),
///         r#"{% extends "base.html" %}{% block title %}Home {{ n }}{% endblock %}"#.into(),
///     )],
/// };
///
/// let cache = TemplateCache::from_sources(&sources).unwrap();
/// let html = cache.execute("home", &serde_json::json!({ "n": 1 })).unwrap();
/// assert_eq!(html, b"<title>Home 1</title>");
/// ```
#[derive(Debug, Default)]
pub struct TemplateCache {
    sets: HashMap<String, TemplateSet>,
}

impl TemplateCache {
    /// Reads and compiles every page under `dir`.
    pub fn build(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Self::from_sources(&TemplateSources::load(dir)?)
    }

    /// Compiles every page in `sources`.
    pub fn from_sources(sources: &TemplateSources) -> Result<Self, TemplateError> {
        let sets = sources
            .pages
            .iter()
            .map(|(page, src)| {
                TemplateSet::compile(page, sources, src).map(|set| (page.clone(), set))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(Self { sets })
    }

    /// Returns the set for `page`.
    #[must_use]
    pub fn get(&self, page: &str) -> Option<&TemplateSet> {
        self.sets.get(page)
    }

    /// Returns `true` if `page` is cached.
    #[must_use]
    pub fn contains(&self, page: &str) -> bool {
        self.sets.contains_key(page)
    }

    /// Returns the cached page names, sorted.
    #[must_use]
    pub fn pages(&self) -> Vec<&str> {
        let mut pages: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        pages.sort_unstable();
        pages
    }

    /// Returns the number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if no pages are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Looks up `page` and executes it against `data` into a buffer.
    pub fn execute<T: Serialize>(&self, page: &str, data: &T) -> Result<Vec<u8>, TemplateError> {
        let set = self
            .get(page)
            .ok_or_else(|| TemplateError::PageNotFound(page.to_string()))?;
        let context = Context::from_serialize(data).map_err(|source| TemplateError::Render {
            page: page.to_string(),
            source,
        })?;
        set.execute(&context)
    }
}

fn read_file(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns `(file stem, source)` of every `*.html` file in `dir`, sorted.
fn read_html_files(dir: &Path) -> Result<Vec<(String, String)>, TemplateError> {
    let io_err = |source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| TemplateError::InvalidFileName(path.clone()))?
                .to_string();
            Ok((stem, read_file(&path)?))
        })
        .collect()
}

/// Bodies of every `{% ... %}` tag, whitespace-control dashes removed.
fn tags(src: &str) -> impl Iterator<Item = &str> {
    src.split("{%").skip(1).filter_map(|rest| {
        rest.split_once("%}")
            .map(|(tag, _)| tag.trim_matches('-').trim())
    })
}

fn string_literal(s: &str) -> Option<&str> {
    let s = s.trim_start();
    let quote = s.chars().next().filter(|c| matches!(c, '"' | '\'' | '`'))?;
    s[1..].split(quote).next()
}

fn extends_base(src: &str) -> bool {
    src.trim_start().starts_with("{%")
        && tags(src)
            .next()
            .and_then(|tag| tag.strip_prefix("extends"))
            .and_then(string_literal)
            == Some(BASE_TEMPLATE)
}

/// Templates named by plain `{% include "..." %}` tags.
///
/// Includes marked `ignore missing` are skipped.
fn includes(src: &str) -> impl Iterator<Item = &str> {
    tags(src).filter_map(|tag| {
        let rest = tag.strip_prefix("include")?;
        if rest.contains("ignore missing") {
            return None;
        }
        string_literal(rest)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extends_base() {
        assert!(extends_base(r#"{% extends "base.html" %}{% block main %}{% endblock %}"#));
        assert!(extends_base("\n{%- extends 'base.html' -%}"));
        assert!(!extends_base(r#"{% extends "other.html" %}"#));
        assert!(!extends_base(r#"<p>hi</p>{% extends "base.html" %}"#));
        assert!(!extends_base("{% block main %}{% endblock %}"));
    }

    #[test]
    fn test_includes() {
        let src = r#"{% include "partials/nav.html" %} {{ x }} {%- include 'partials/footer.html' -%}
            {% include "partials/maybe.html" ignore missing %}"#;
        let found: Vec<&str> = includes(src).collect();
        assert_eq!(found, vec!["partials/nav.html", "partials/footer.html"]);
    }

    #[test]
    fn test_pages_sorted() {
        let page = |name: &str| {
            (
                name.to_string(),
                r#"{% extends "base.html" %}"#.to_string(),
            )
        };
        let sources = TemplateSources {
            base: "{% block main %}{% endblock %}".into(),
            partials: vec![],
            pages: vec![page("view"), page("create"), page("home")],
        };

        let cache = TemplateCache::from_sources(&sources).unwrap();
        assert_eq!(cache.pages(), vec!["create", "home", "view"]);
        assert_eq!(cache.get("home").map(TemplateSet::page), Some("home"));
    }
}
