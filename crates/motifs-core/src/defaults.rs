//! Centralized default constants for the motif search service.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// SEARCH
// =============================================================================

/// Queries shorter than this are rejected before they reach the engine.
pub const MIN_SEARCH_LEN: usize = 2;

/// Longest query, in characters, accepted from a caller.
pub const MAX_SEARCH_LEN: usize = 1024;

/// Deepest parenthesis nesting accepted in a boolean query.
pub const MAX_QUERY_DEPTH: usize = 32;

/// Smallest page size a caller can request; smaller values are raised to it.
pub const MIN_PAGE_SIZE: i64 = 10;

/// Largest page size a caller can request; larger values are lowered to it.
pub const MAX_PAGE_SIZE: i64 = 100;

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

// =============================================================================
// CACHE
// =============================================================================

/// Default number of assembled search pages kept in memory.
pub const SEARCH_CACHE_CAPACITY: usize = 1000;

/// Default lifetime of a cached search page in seconds.
pub const SEARCH_CACHE_TTL_SECS: u64 = 300;

/// Default lifetime of the cached dataset list in seconds.
pub const DATASETS_CACHE_TTL_SECS: u64 = 3600;

// =============================================================================
// IMPORT
// =============================================================================

/// Widest motif matrix accepted from a MEME file.
pub const MAX_MOTIF_WIDTH: usize = 1000;

/// Most genes a single SwissRegulon range such as `E2F1..5` may expand to.
pub const MAX_GENE_RANGE: u32 = 100;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8080;

/// Default SQLite database path.
pub const DATABASE_PATH: &str = "data/modules/motifs/motifs.db";

// =============================================================================
// DATABASE POOL
// =============================================================================

/// Default maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default connection acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle connection timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds_are_ordered() {
        assert!(MIN_PAGE_SIZE >= 1);
        assert!(MIN_PAGE_SIZE <= MAX_PAGE_SIZE);
    }

    #[test]
    fn test_search_len_bounds_are_ordered() {
        assert!(MIN_SEARCH_LEN < MAX_SEARCH_LEN);
        assert!(MAX_QUERY_DEPTH >= 1);
    }

    #[test]
    fn test_cache_ttls_nonzero() {
        assert!(SEARCH_CACHE_TTL_SECS > 0);
        assert!(DATASETS_CACHE_TTL_SECS > 0);
    }
}
