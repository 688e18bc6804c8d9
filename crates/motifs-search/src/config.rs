//! Engine configuration.
//!
//! Environment variables:
//! - `SEARCH_CACHE_CAPACITY`: result cache entries, `0` disables it (default: 1000)
//! - `SEARCH_CACHE_TTL_SECS`: result lifetime in seconds (default: 300)
//! - `DATASETS_CACHE_TTL_SECS`: dataset list lifetime in seconds (default: 3600)

use std::time::Duration;

use tracing::warn;

use motifs_core::defaults::{DATASETS_CACHE_TTL_SECS, SEARCH_CACHE_CAPACITY, SEARCH_CACHE_TTL_SECS};

/// Cache sizing and lifetimes for [`crate::MotifSearchEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub cache_capacity: usize,
    pub cache_ttl: Duration,
    pub datasets_ttl: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_capacity: SEARCH_CACHE_CAPACITY,
            cache_ttl: Duration::from_secs(SEARCH_CACHE_TTL_SECS),
            datasets_ttl: Duration::from_secs(DATASETS_CACHE_TTL_SECS),
        }
    }
}

impl SearchConfig {
    /// Read the configuration from the environment, falling back to defaults
    /// for missing or unparsable values.
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env_or("SEARCH_CACHE_CAPACITY", SEARCH_CACHE_CAPACITY),
            cache_ttl: Duration::from_secs(env_or("SEARCH_CACHE_TTL_SECS", SEARCH_CACHE_TTL_SECS)),
            datasets_ttl: Duration::from_secs(env_or(
                "DATASETS_CACHE_TTL_SECS",
                DATASETS_CACHE_TTL_SECS,
            )),
        }
    }

    /// Set the result cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the result lifetime.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the dataset list lifetime.
    pub fn datasets_ttl(mut self, ttl: Duration) -> Self {
        self.datasets_ttl = ttl;
        self
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(
                subsystem = "search",
                component = "config",
                variable = name,
                value = %raw,
                "Ignoring unparsable setting"
            );
            default
        }),
        Err(_) => default,
    }
}
