//! # motifs-db
//!
//! SQLite storage layer for the motif search service.
//!
//! This crate provides:
//! - Connection pool management
//! - Catalog schema and the MEME importer
//! - Boolean predicate compilation
//! - Transactional, read-only motif search
//!
//! ## Example
//!
//! ```rust,ignore
//! use motifs_db::Database;
//! use motifs_core::{Paging, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("data/modules/motifs/motifs.db").await?;
//!
//!     let request = SearchRequest::terms(&["sox2"], &[] as &[&str], Paging::default(), false)?;
//!     let result = db.search.search(&request).await?;
//!
//!     println!("{} motifs", result.total);
//!     Ok(())
//! }
//! ```
pub mod assembler;
pub mod datasets;
pub mod loader;
pub mod pool;
pub mod predicate;
pub mod schema;
pub mod scope;
pub mod search;

#[cfg(feature = "test-fixtures")]
pub mod test_fixtures;

use async_trait::async_trait;
use sqlx::SqlitePool;

pub use datasets::SqliteDatasetRepository;
pub use loader::{import_dataset, insert_dataset, ImportSummary, NewDataset, NewMotif};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use predicate::{compile, BoolPredicateBuilder, CompiledPredicates, Predicate, PredicateEmitter};
pub use schema::create_schema;
pub use search::SqliteMotifSearch;

// Re-export core types for convenience
pub use motifs_core::*;

/// Database handle holding the pool and the repositories built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: SqlitePool,
    /// Dataset listing.
    pub datasets: SqliteDatasetRepository,
    /// Motif search.
    pub search: SqliteMotifSearch,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            datasets: SqliteDatasetRepository::new(pool.clone()),
            search: SqliteMotifSearch::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with a custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::new(pool))
    }

    /// Create the catalog tables if they don't exist yet.
    pub async fn migrate(&self) -> Result<()> {
        create_schema(&self.pool).await
    }
}

#[async_trait]
impl MotifStore for Database {
    async fn datasets(&self) -> Result<Vec<Dataset>> {
        self.datasets.list().await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        self.search.search(request).await
    }
}
