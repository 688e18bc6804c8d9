//! Transactional motif search.
//!
//! Each search runs on one connection inside one transaction:
//!
//! 1. load the dataset allow-list (and simple-mode term patterns) into TEMP
//!    tables,
//! 2. count matches per dataset and sum them,
//! 3. select the requested page ordered by dataset public id, then motif id,
//! 4. load weights for every page row.
//!
//! The transaction is rolled back whatever the outcome, which also discards
//! the TEMP tables.

use std::time::Instant;

use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use motifs_core::{Error, MotifQuery, Result, SearchRequest, SearchResult};

use crate::assembler::{assemble, MotifRow, PAGE_COLUMNS};
use crate::predicate::compile;
use crate::scope::{build_scope, DATASET_SCOPE, TERM_MATCH};

/// Candidate filter for one request.
struct MatchFilter {
    sql: String,
    args: Vec<String>,
    /// Whether the statement text is stable enough to cache.
    persistent: bool,
}

impl MatchFilter {
    fn for_query(query: &MotifQuery) -> Self {
        match query {
            MotifQuery::Terms(_) => Self {
                sql: TERM_MATCH.to_string(),
                args: Vec::new(),
                persistent: true,
            },
            MotifQuery::Bool(expr) => {
                let compiled = compile(expr, 0);
                debug!(
                    subsystem = "database",
                    component = "search",
                    params = compiled.param_count(),
                    sql_len = compiled.rows.sql.len(),
                    motif_sql_len = compiled.motifs.sql.len(),
                    dataset_sql_len = compiled.datasets.sql.len(),
                    "Compiled boolean predicate"
                );
                Self {
                    sql: compiled.rows.sql,
                    args: compiled.rows.args,
                    persistent: false,
                }
            }
        }
    }

    /// CTE selecting each matched motif once, tagged with its dataset.
    fn matched_cte(&self) -> String {
        format!(
            r#"
            WITH matched AS (
                SELECT m.id AS motif_pk, d.public_id AS dataset_public_id
                FROM motifs m
                JOIN datasets d ON d.id = m.dataset_id
                WHERE {}
                  AND ({})
            )
            "#,
            DATASET_SCOPE, self.sql
        )
    }
}

/// Search over the motif catalog.
#[derive(Clone)]
pub struct SqliteMotifSearch {
    pool: SqlitePool,
}

impl SqliteMotifSearch {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run one search in a transaction that is always rolled back.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let start = Instant::now();

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let outcome = execute(&mut tx, request).await;
        let rollback = tx.rollback().await.map_err(Error::Database);
        let result = outcome?;
        rollback?;

        debug!(
            subsystem = "database",
            component = "search",
            op = "search",
            mode = request.mode().as_str(),
            query = %request.query.normalized(),
            dataset_count = request.datasets.len(),
            total = result.total,
            result_count = result.motifs.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Search transaction finished"
        );
        Ok(result)
    }
}

async fn execute(conn: &mut SqliteConnection, request: &SearchRequest) -> Result<SearchResult> {
    let terms = match &request.query {
        MotifQuery::Terms(terms) => Some(terms.as_slice()),
        MotifQuery::Bool(_) => None,
    };
    build_scope(conn, &request.datasets, terms).await?;

    let filter = MatchFilter::for_query(&request.query);
    let total = count_matches(conn, &filter).await?;
    let paging = request.paging.with_total(total);

    let offset = paging.offset();
    if total == 0 || offset >= total {
        debug!(
            subsystem = "database",
            component = "search",
            total,
            offset,
            "Requested page is empty"
        );
        return Ok(SearchResult {
            paging,
            motifs: Vec::new(),
            total,
        });
    }

    let rows = fetch_page(conn, &filter, paging.page_size, offset).await?;
    let motifs = assemble(conn, rows, request.rev_comp).await?;

    Ok(SearchResult {
        paging,
        motifs,
        total,
    })
}

/// Matched motifs per dataset, summed. Each motif is counted once.
async fn count_matches(conn: &mut SqliteConnection, filter: &MatchFilter) -> Result<i64> {
    let sql = format!(
        r#"{}
        SELECT dataset_public_id, COUNT(DISTINCT motif_pk) AS motif_count
        FROM matched
        GROUP BY dataset_public_id
        ORDER BY dataset_public_id
        "#,
        filter.matched_cte()
    );

    let mut query = sqlx::query::<Sqlite>(&sql).persistent(filter.persistent);
    for arg in &filter.args {
        query = query.bind(arg.as_str());
    }
    let rows = query.fetch_all(&mut *conn).await.map_err(Error::Database)?;

    let mut total = 0i64;
    for row in &rows {
        let count: i64 = row.try_get("motif_count").map_err(Error::Database)?;
        total += count;
    }

    debug!(
        subsystem = "database",
        component = "search",
        datasets_matched = rows.len(),
        total,
        "Counted matches"
    );
    Ok(total)
}

async fn fetch_page(
    conn: &mut SqliteConnection,
    filter: &MatchFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<MotifRow>> {
    let n = filter.args.len();
    let sql = format!(
        r#"{}
        SELECT {}
        FROM matched x
        JOIN motifs m ON m.id = x.motif_pk
        JOIN datasets d ON d.id = m.dataset_id
        ORDER BY d.public_id, m.motif_id, m.id
        LIMIT ?{} OFFSET ?{}
        "#,
        filter.matched_cte(),
        PAGE_COLUMNS,
        n + 1,
        n + 2
    );

    let mut query = sqlx::query::<Sqlite>(&sql).persistent(filter.persistent);
    for arg in &filter.args {
        query = query.bind(arg.as_str());
    }
    let rows = query
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(Error::Database)?;

    rows.iter().map(MotifRow::from_row).collect()
}
