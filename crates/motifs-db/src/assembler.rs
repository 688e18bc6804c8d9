//! Turns matched rows into fully populated [`Motif`] values.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use tracing::trace;

use motifs_core::{reverse_complement, BaseWeights, Dataset, Error, Motif, Result};

/// Separator for the `genes` column.
pub const GENE_SEPARATOR: &str = "|";

/// Columns every page row must carry.
pub const PAGE_COLUMNS: &str = "m.id AS id, \
     m.public_id AS public_id, \
     m.motif_id AS motif_id, \
     m.motif_name AS motif_name, \
     m.genes AS genes, \
     d.public_id AS dataset_public_id, \
     d.name AS dataset_name, \
     (SELECT COUNT(*) FROM motifs dm WHERE dm.dataset_id = d.id) AS dataset_motif_count";

/// Identity of one matched motif, before its weights are loaded.
#[derive(Debug, Clone)]
pub struct MotifRow {
    pub id: i64,
    pub public_id: String,
    pub motif_id: String,
    pub motif_name: String,
    pub genes: String,
    pub dataset: Dataset,
}

impl MotifRow {
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        Ok(Self {
            id: row.try_get("id").map_err(Error::Database)?,
            public_id: row.try_get("public_id").map_err(Error::Database)?,
            motif_id: row.try_get("motif_id").map_err(Error::Database)?,
            motif_name: row.try_get("motif_name").map_err(Error::Database)?,
            genes: row.try_get("genes").map_err(Error::Database)?,
            dataset: Dataset {
                public_id: row.try_get("dataset_public_id").map_err(Error::Database)?,
                name: row.try_get("dataset_name").map_err(Error::Database)?,
                motif_count: row.try_get("dataset_motif_count").map_err(Error::Database)?,
            },
        })
    }
}

/// Split the stored gene list, dropping empty entries.
pub fn split_genes(genes: &str) -> Vec<String> {
    genes
        .split(GENE_SEPARATOR)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// Weights of one motif ordered by increasing position.
pub async fn fetch_weights(conn: &mut SqliteConnection, motif_pk: i64) -> Result<Vec<BaseWeights>> {
    let rows = sqlx::query("SELECT a, c, g, t FROM weights WHERE motif_id = ?1 ORDER BY position")
        .bind(motif_pk)
        .fetch_all(&mut *conn)
        .await
        .map_err(Error::Database)?;

    rows.iter()
        .map(|row| {
            Ok([
                row.try_get::<f64, _>("a").map_err(Error::Database)?,
                row.try_get::<f64, _>("c").map_err(Error::Database)?,
                row.try_get::<f64, _>("g").map_err(Error::Database)?,
                row.try_get::<f64, _>("t").map_err(Error::Database)?,
            ])
        })
        .collect()
}

/// Load weights for each page row, preserving row order.
///
/// With `rev_comp` the reverse complement replaces the stored matrix.
pub async fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<MotifRow>,
    rev_comp: bool,
) -> Result<Vec<Motif>> {
    let mut motifs = Vec::with_capacity(rows.len());

    for row in rows {
        let mut weights = fetch_weights(conn, row.id).await?;
        if rev_comp {
            weights = reverse_complement(weights);
        }

        trace!(
            subsystem = "database",
            component = "assembler",
            motif_id = %row.motif_id,
            positions = weights.len(),
            "Motif assembled"
        );

        motifs.push(Motif {
            public_id: row.public_id,
            dataset: row.dataset,
            motif_id: row.motif_id,
            genes: split_genes(&row.genes),
            motif_name: row.motif_name,
            weights,
        });
    }

    Ok(motifs)
}
