//! Structured logging schema and field name constants.
//!
//! All crates use these names for structured logging fields so that log
//! aggregation can query by the same field across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), search completions |
//! | DEBUG | Decision points: cache hit/miss, clamped paging, compiled predicates |
//! | TRACE | Per-row output (assembled motifs, scope rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "search", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "engine", "cache", "config", "scope", "assembler", "pool", "loader"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "bool_search", "datasets", "count", "page"
pub const OPERATION: &str = "op";

// ─── Query fields ──────────────────────────────────────────────────────────

/// Search query text (term list joined or boolean expression).
pub const QUERY: &str = "query";

/// Search mode ("terms" or "bool").
pub const MODE: &str = "mode";

/// Number of datasets in the allow-list.
pub const DATASET_COUNT: &str = "dataset_count";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of motifs returned on the page.
pub const RESULT_COUNT: &str = "result_count";

/// Total matching motifs across all pages.
pub const TOTAL: &str = "total";

/// Whether the result came from the cache.
pub const CACHE_HIT: &str = "cache_hit";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
