//! Dataset listing.

use sqlx::{Row, SqlitePool};
use tracing::debug;

use motifs_core::{Dataset, Error, Result};

/// Read access to the `datasets` table.
#[derive(Clone)]
pub struct SqliteDatasetRepository {
    pool: SqlitePool,
}

impl SqliteDatasetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every dataset with its motif count, ordered by name.
    pub async fn list(&self) -> Result<Vec<Dataset>> {
        let rows = sqlx::query(
            r#"
            SELECT d.public_id, d.name, COUNT(m.id) AS motif_count
            FROM datasets d
            LEFT JOIN motifs m ON m.dataset_id = d.id
            GROUP BY d.id, d.public_id, d.name
            ORDER BY d.name, d.public_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let datasets = rows
            .iter()
            .map(|row| {
                Ok(Dataset {
                    public_id: row.try_get("public_id").map_err(Error::Database)?,
                    name: row.try_get("name").map_err(Error::Database)?,
                    motif_count: row.try_get("motif_count").map_err(Error::Database)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "database",
            component = "datasets",
            op = "list",
            result_count = datasets.len(),
            "Datasets listed"
        );
        Ok(datasets)
    }
}
