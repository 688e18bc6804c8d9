//! Cached motif search engine.
//!
//! The engine validates and normalizes requests, consults the result cache
//! and otherwise delegates to a [`MotifStore`]. One engine is built at
//! startup and shared; all methods take `&self`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use motifs_core::{Dataset, MotifStore, Paging, Result, SearchRequest, SearchResult};

use crate::cache::{CacheKey, CacheStats, TtlCache};
use crate::config::SearchConfig;

/// Search entry point shared by all request handlers.
pub struct MotifSearchEngine {
    store: Arc<dyn MotifStore>,
    results: TtlCache<CacheKey, Arc<SearchResult>>,
    datasets: TtlCache<(), Arc<Vec<Dataset>>>,
}

impl MotifSearchEngine {
    pub fn new(store: Arc<dyn MotifStore>, config: SearchConfig) -> Self {
        info!(
            subsystem = "search",
            component = "engine",
            op = "init",
            cache_capacity = config.cache_capacity,
            cache_ttl_secs = config.cache_ttl.as_secs(),
            datasets_ttl_secs = config.datasets_ttl.as_secs(),
            "Motif search engine ready"
        );

        Self {
            store,
            results: TtlCache::new("results", config.cache_capacity, config.cache_ttl),
            datasets: TtlCache::new("datasets", 1, config.datasets_ttl),
        }
    }

    /// All datasets ordered by name.
    #[instrument(skip(self), fields(subsystem = "search", component = "engine", op = "datasets"))]
    pub async fn datasets(&self, use_cache: bool) -> Result<Vec<Dataset>> {
        if use_cache {
            if let Some(datasets) = self.datasets.get(&()).await {
                debug!(cache_hit = true, "Dataset list served from cache");
                return Ok(datasets.as_ref().clone());
            }
        }

        let datasets = Arc::new(self.store.datasets().await?);
        if use_cache {
            self.datasets.put((), Arc::clone(&datasets)).await;
        }

        debug!(
            cache_hit = false,
            result_count = datasets.len(),
            "Dataset list loaded"
        );
        Ok(datasets.as_ref().clone())
    }

    /// Simple search: each query string is prefix-matched and the matches are
    /// OR-combined. Blank strings are dropped; if none remain the call fails
    /// with `EmptyScope` without touching storage.
    #[instrument(skip_all, fields(
        subsystem = "search",
        component = "engine",
        op = "search",
        term_count = queries.len(),
        dataset_count = datasets.len(),
        rev_comp = rev_comp,
        use_cache = use_cache,
    ))]
    pub async fn search<S, D>(
        &self,
        queries: &[S],
        datasets: &[D],
        paging: Paging,
        rev_comp: bool,
        use_cache: bool,
    ) -> Result<SearchResult>
    where
        S: AsRef<str> + Sync,
        D: AsRef<str> + Sync,
    {
        let request = SearchRequest::terms(queries, datasets, paging, rev_comp)?;
        self.execute(request, paging, use_cache).await
    }

    /// Boolean search over a query expression. Parse failures are returned
    /// before storage is touched.
    #[instrument(skip_all, fields(
        subsystem = "search",
        component = "engine",
        op = "bool_search",
        dataset_count = datasets.len(),
        rev_comp = rev_comp,
        use_cache = use_cache,
    ))]
    pub async fn bool_search<D>(
        &self,
        query: &str,
        datasets: &[D],
        paging: Paging,
        rev_comp: bool,
        use_cache: bool,
    ) -> Result<SearchResult>
    where
        D: AsRef<str> + Sync,
    {
        let request = SearchRequest::boolean(query, datasets, paging, rev_comp)?;
        self.execute(request, paging, use_cache).await
    }

    async fn execute(
        &self,
        request: SearchRequest,
        requested: Paging,
        use_cache: bool,
    ) -> Result<SearchResult> {
        let start = Instant::now();

        if request.paging.page != requested.page || request.paging.page_size != requested.page_size
        {
            debug!(
                page = request.paging.page,
                page_size = request.paging.page_size,
                requested_page = requested.page,
                requested_page_size = requested.page_size,
                "Paging clamped"
            );
        }

        let key = if use_cache {
            Some(CacheKey::for_request(&request)?)
        } else {
            None
        };

        if let Some(key) = &key {
            if let Some(cached) = self.results.get(key).await {
                debug!(cache_hit = true, key = key.as_str(), "Search served from cache");
                return Ok(cached.as_ref().clone());
            }
            debug!(cache_hit = false, key = key.as_str(), "Search cache miss");
        }

        let result = Arc::new(self.store.search(&request).await?);

        if let Some(key) = key {
            self.results.put(key, Arc::clone(&result)).await;
        }

        info!(
            mode = request.mode().as_str(),
            query = %request.query.normalized(),
            total = result.total,
            result_count = result.motifs.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(result.as_ref().clone())
    }

    /// Result cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.results.stats()
    }

    /// Entries currently held by the result cache.
    pub async fn cached_results(&self) -> usize {
        self.results.len().await
    }

    /// Drop every cached result and the cached dataset list.
    pub async fn clear_caches(&self) {
        self.results.clear().await;
        self.datasets.clear().await;
    }
}
