//! Catalog import.
//!
//! The search path never writes; this module is used by `motifs-import` and
//! the test fixtures to build a catalog from MEME files.

use std::time::Instant;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use motifs_core::{BaseWeights, Error, GeneRule, MemeMotif, Result};

use crate::assembler::GENE_SEPARATOR;

/// A motif ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMotif {
    pub public_id: String,
    pub motif_id: String,
    pub motif_name: String,
    pub genes: Vec<String>,
    pub weights: Vec<BaseWeights>,
}

/// A dataset and its motifs ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDataset {
    pub public_id: String,
    pub name: String,
    pub motifs: Vec<NewMotif>,
}

impl NewDataset {
    /// Build a dataset from parsed MEME motifs, deriving genes with `rule`.
    /// Public ids are fresh UUIDv7 values.
    pub fn from_meme(name: &str, rule: &GeneRule, motifs: Vec<MemeMotif>) -> Result<Self> {
        let motifs = motifs
            .into_iter()
            .map(|m| {
                Ok(NewMotif {
                    public_id: Uuid::now_v7().to_string(),
                    genes: rule.genes(&m.motif_id, &m.motif_name)?,
                    motif_id: m.motif_id,
                    motif_name: m.motif_name,
                    weights: m.weights,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            public_id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            motifs,
        })
    }
}

/// Outcome of one dataset import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub dataset_public_id: String,
    pub motifs: usize,
    pub weights: usize,
}

/// Import parsed MEME `motifs` as a new dataset `name` in one committed
/// transaction.
pub async fn import_dataset(
    pool: &SqlitePool,
    name: &str,
    rule: &GeneRule,
    motifs: Vec<MemeMotif>,
) -> Result<ImportSummary> {
    insert_dataset(pool, &NewDataset::from_meme(name, rule, motifs)?).await
}

/// Insert a prepared dataset in one committed transaction.
pub async fn insert_dataset(pool: &SqlitePool, dataset: &NewDataset) -> Result<ImportSummary> {
    let start = Instant::now();
    let mut tx = pool.begin().await.map_err(Error::Database)?;

    let dataset_pk: i64 = sqlx::query_scalar(
        "INSERT INTO datasets (public_id, name) VALUES (?1, ?2) RETURNING id",
    )
    .bind(&dataset.public_id)
    .bind(&dataset.name)
    .fetch_one(&mut *tx)
    .await
    .map_err(Error::Database)?;

    let mut weights = 0;
    for motif in &dataset.motifs {
        weights += insert_motif(&mut tx, dataset_pk, motif).await?;
    }

    tx.commit().await.map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "loader",
        op = "import",
        dataset = %dataset.name,
        motifs = dataset.motifs.len(),
        weights,
        duration_ms = start.elapsed().as_millis() as u64,
        "Dataset imported"
    );

    Ok(ImportSummary {
        dataset_public_id: dataset.public_id.clone(),
        motifs: dataset.motifs.len(),
        weights,
    })
}

/// Insert one motif and its weights; returns the number of weight rows.
async fn insert_motif(
    conn: &mut SqliteConnection,
    dataset_pk: i64,
    motif: &NewMotif,
) -> Result<usize> {
    let genes = motif.genes.join(GENE_SEPARATOR);

    let motif_pk: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO motifs (public_id, dataset_id, motif_id, motif_name, genes, length)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING id
        "#,
    )
    .bind(&motif.public_id)
    .bind(dataset_pk)
    .bind(&motif.motif_id)
    .bind(&motif.motif_name)
    .bind(genes)
    .bind(motif.weights.len() as i64)
    .fetch_one(&mut *conn)
    .await
    .map_err(Error::Database)?;

    for (idx, [a, c, g, t]) in motif.weights.iter().enumerate() {
        sqlx::query(
            "INSERT INTO weights (motif_id, position, a, c, g, t) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(motif_pk)
        .bind(idx as i64 + 1)
        .bind(*a)
        .bind(*c)
        .bind(*g)
        .bind(*t)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;
    }

    debug!(
        subsystem = "database",
        component = "loader",
        motif_id = %motif.motif_id,
        positions = motif.weights.len(),
        "Motif inserted"
    );
    Ok(motif.weights.len())
}
