//! The snippet entity and the persistence seam.
//!
//! Handlers only see [`SnippetStore`]. [`MemoryStore`] is the bundled
//! implementation; a database-backed store implements the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AppError;

/// A stored text snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Store-assigned identifier, starting at 1.
    pub id: i64,
    /// Snippet title.
    pub title: String,
    /// Snippet body.
    pub content: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Time after which the snippet is no longer visible.
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// Returns `true` once `now` has reached the expiry time.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// Errors returned by a [`SnippetStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No visible record matches the query.
    #[error("no matching record found")]
    NoRecord,

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoRecord => AppError::not_found("no matching snippet"),
            other => AppError::internal_with_source("snippet store failed", other),
        }
    }
}

/// Persistence operations over snippets.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Returns the unexpired snippet with the given id.
    async fn get(&self, id: i64) -> Result<Snippet, StoreError>;

    /// Stores a snippet that expires `expires_days` from now and returns its id.
    async fn insert(&self, title: &str, content: &str, expires_days: u32)
        -> Result<i64, StoreError>;

    /// Returns up to `limit` unexpired snippets, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>, StoreError>;
}

/// In-process snippet store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snippets: RwLock<Vec<Snippet>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored snippets, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snippets.read().len()
    }

    /// Returns `true` if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snippets.read().is_empty()
    }
}

#[async_trait]
impl SnippetStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Snippet, StoreError> {
        let now = Utc::now();
        self.snippets
            .read()
            .iter()
            .find(|s| s.id == id && !s.is_expired(now))
            .cloned()
            .ok_or(StoreError::NoRecord)
    }

    async fn insert(
        &self,
        title: &str,
        content: &str,
        expires_days: u32,
    ) -> Result<i64, StoreError> {
        let created = Utc::now();
        let mut snippets = self.snippets.write();
        let id = snippets.last().map_or(1, |s| s.id + 1);
        snippets.push(Snippet {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created,
            expires: created + Duration::days(i64::from(expires_days)),
        });
        Ok(id)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Snippet>, StoreError> {
        let now = Utc::now();
        Ok(self
            .snippets
            .read()
            .iter()
            .rev()
            .filter(|s| !s.is_expired(now))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let id = store.insert("An old silent pond", "A frog jumps in", 7).await.unwrap();
        assert_eq!(id, 1);

        let snippet = store.get(id).await.unwrap();
        assert_eq!(snippet.title, "An old silent pond");
        assert_eq!(snippet.expires - snippet.created, Duration::days(7));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let first = store.insert("a", "a", 1).await.unwrap();
        let second = store.insert("b", "b", 1).await.unwrap();
        assert_eq!(second, first + 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(99).await, Err(StoreError::NoRecord)));
    }

    #[tokio::test]
    async fn test_expired_snippets_are_hidden() {
        let store = MemoryStore::new();
        let id = store.insert("gone", "already expired", 0).await.unwrap();
        store.insert("here", "still visible", 365).await.unwrap();

        assert!(matches!(store.get(id).await, Err(StoreError::NoRecord)));
        let latest = store.latest(10).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].title, "here");
    }

    #[tokio::test]
    async fn test_latest_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for n in 0..12 {
            store.insert(&format!("snippet {n}"), "body", 365).await.unwrap();
        }

        let latest = store.latest(10).await.unwrap();
        assert_eq!(latest.len(), 10);
        assert_eq!(latest[0].title, "snippet 11");
        assert_eq!(latest[9].title, "snippet 2");
    }

    #[test]
    fn test_store_error_maps_to_app_error() {
        let not_found: AppError = StoreError::NoRecord.into();
        assert_eq!(not_found.status_code(), http::StatusCode::NOT_FOUND);

        let internal: AppError = StoreError::Unavailable("db down".into()).into();
        assert!(internal.is_server_fault());
    }
}
