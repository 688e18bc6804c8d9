//! Catalog schema.
//!
//! The catalog is built once by the importer and only read afterwards.
//! Statements are idempotent so `create_schema` can run on every start.

use sqlx::SqlitePool;
use tracing::info;

use motifs_core::{Error, Result};

/// DDL for the catalog tables and their lookup indexes, in creation order.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS datasets (
        id INTEGER PRIMARY KEY,
        public_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS motifs (
        id INTEGER PRIMARY KEY,
        public_id TEXT NOT NULL UNIQUE,
        dataset_id INTEGER NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
        motif_id TEXT NOT NULL,
        motif_name TEXT NOT NULL,
        genes TEXT NOT NULL,
        length INTEGER NOT NULL,
        UNIQUE(dataset_id, motif_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS weights (
        id INTEGER PRIMARY KEY,
        motif_id INTEGER NOT NULL REFERENCES motifs(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        a REAL NOT NULL,
        c REAL NOT NULL,
        g REAL NOT NULL,
        t REAL NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS datasets_name_idx ON datasets (LOWER(name))",
    "CREATE INDEX IF NOT EXISTS motifs_motif_id_idx ON motifs (LOWER(motif_id))",
    "CREATE INDEX IF NOT EXISTS motifs_motif_name_idx ON motifs (LOWER(motif_name))",
    "CREATE INDEX IF NOT EXISTS motifs_dataset_id_idx ON motifs (dataset_id)",
    "CREATE INDEX IF NOT EXISTS weights_motif_position_idx ON weights (motif_id, position)",
];

/// Create all catalog tables and indexes in one transaction.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await.map_err(Error::Database)?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
    }

    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "schema",
        op = "create",
        statements = SCHEMA.len(),
        "Catalog schema ready"
    );
    Ok(())
}
