//! Per-search filter sets.
//!
//! The dataset allow-list and the simple-mode term patterns are loaded into
//! connection-local TEMP tables inside the search transaction. The search
//! transaction is always rolled back, which drops the tables and their rows
//! again, so nothing leaks into the next search on the same connection.

use sqlx::SqliteConnection;
use tracing::trace;

use motifs_core::{Error, Result};

/// DDL for the filter tables. Must run inside the search transaction.
const CREATE_SCOPE_TABLES: &[&str] = &[
    "CREATE TEMP TABLE IF NOT EXISTS search_datasets (value TEXT PRIMARY KEY)",
    "CREATE TEMP TABLE IF NOT EXISTS search_terms (pattern TEXT PRIMARY KEY)",
];

/// Restricts `d` to the allow-list; an empty list allows every dataset.
pub const DATASET_SCOPE: &str = "(NOT EXISTS (SELECT 1 FROM temp.search_datasets) \
     OR d.public_id IN (SELECT value FROM temp.search_datasets) \
     OR d.name IN (SELECT value FROM temp.search_datasets))";

/// Matches a motif row `m` with owning dataset `d` against any stored term
/// pattern.
pub const TERM_MATCH: &str = "EXISTS (SELECT 1 FROM temp.search_terms t \
     WHERE m.public_id = t.pattern \
     OR m.motif_id LIKE t.pattern \
     OR m.motif_name LIKE t.pattern \
     OR d.public_id = t.pattern \
     OR d.name LIKE t.pattern)";

/// Rows written while building the scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeSummary {
    pub datasets: u64,
    pub patterns: u64,
}

/// Patterns stored for one simple-mode term: a prefix pattern and the exact
/// identifier.
pub fn term_patterns(term: &str) -> [String; 2] {
    [format!("{}%", term), term.to_string()]
}

/// Create the filter tables and load `datasets` and, for simple mode,
/// `terms`. Duplicates collapse.
pub async fn build_scope(
    conn: &mut SqliteConnection,
    datasets: &[String],
    terms: Option<&[String]>,
) -> Result<ScopeSummary> {
    for statement in CREATE_SCOPE_TABLES {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?;
    }

    let mut summary = ScopeSummary::default();

    for dataset in datasets {
        summary.datasets += sqlx::query("INSERT OR IGNORE INTO temp.search_datasets (value) VALUES (?1)")
            .bind(dataset)
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?
            .rows_affected();
    }

    for term in terms.unwrap_or_default() {
        for pattern in term_patterns(term) {
            summary.patterns += sqlx::query("INSERT OR IGNORE INTO temp.search_terms (pattern) VALUES (?1)")
                .bind(pattern)
                .execute(&mut *conn)
                .await
                .map_err(Error::Database)?
                .rows_affected();
        }
    }

    trace!(
        subsystem = "database",
        component = "scope",
        datasets = summary.datasets,
        patterns = summary.patterns,
        "Search scope loaded"
    );
    Ok(summary)
}
