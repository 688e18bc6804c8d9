//! Core traits for storage abstractions.
//!
//! The search engine talks to storage only through these traits, so the
//! caching and validation layers can be exercised without a database.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Dataset, SearchRequest, SearchResult};

/// Read-only motif catalog.
#[async_trait]
pub trait MotifStore: Send + Sync {
    /// All datasets with their motif counts, ordered by name.
    async fn datasets(&self) -> Result<Vec<Dataset>>;

    /// Execute one search inside its own read transaction and return the
    /// assembled page. Implementations never commit.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult>;
}
