//! Test fixtures for database integration tests.
//!
//! Each [`TestDatabase`] is a fresh SQLite file in its own temporary
//! directory, created through the production schema and loader code paths.
//! The directory is removed when the fixture is dropped.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use motifs_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::seeded().await;
//!     let datasets = test_db.db.datasets.list().await.unwrap();
//!     assert_eq!(datasets.len(), 2);
//! }
//! ```

use std::path::PathBuf;

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::loader::{insert_dataset, NewDataset, NewMotif};
use crate::{create_pool_with_config, create_schema, BaseWeights, Database, PoolConfig};

/// Public ids and names of the seeded scenario.
///
/// | dataset | motif | motif id | name   |
/// |---------|-------|----------|--------|
/// | D1      | M1    | m1       | Foo    |
/// | D1      | M2    | m2       | Bar    |
/// | D2      | M3    | m3       | FooBar |
pub mod scenario {
    pub const D1: &str = "d1";
    pub const D1_NAME: &str = "D1";
    pub const D2: &str = "d2";
    pub const D2_NAME: &str = "D2";

    pub const M1: &str = "pm1";
    pub const M2: &str = "pm2";
    pub const M3: &str = "pm3";
}

/// Weights stored for M1, position order.
pub const M1_WEIGHTS: [BaseWeights; 2] = [[0.7, 0.1, 0.15, 0.05], [0.1, 0.2, 0.3, 0.4]];

/// Test database backed by a temporary file.
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub db: Database,
    pub path: PathBuf,
    _dir: TempDir,
}

impl TestDatabase {
    /// Create an empty catalog with a writable pool.
    pub async fn new() -> Self {
        Self::with_config(PoolConfig::writable()).await
    }

    /// Create an empty catalog with a custom pool configuration. The file is
    /// always created.
    pub async fn with_config(config: PoolConfig) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("motifs.db");
        let url = path.to_string_lossy().into_owned();

        let pool = create_pool_with_config(&url, config.read_only(false).create_if_missing(true))
            .await
            .expect("Failed to create test pool");
        create_schema(&pool)
            .await
            .expect("Failed to create test schema");

        Self {
            db: Database::new(pool.clone()),
            pool,
            path,
            _dir: dir,
        }
    }

    /// Convenience: new catalog with the three-motif scenario loaded.
    pub async fn seeded() -> Self {
        let test_db = Self::new().await;
        test_db.seed_scenario().await;
        test_db
    }

    /// Load the scenario from [`scenario`].
    pub async fn seed_scenario(&self) {
        self.insert(NewDataset {
            public_id: scenario::D1.to_string(),
            name: scenario::D1_NAME.to_string(),
            motifs: vec![
                motif(scenario::M1, "m1", "Foo", &["FOO"], M1_WEIGHTS.to_vec()),
                motif(
                    scenario::M2,
                    "m2",
                    "Bar",
                    &["BAR"],
                    vec![[0.25, 0.25, 0.25, 0.25]],
                ),
            ],
        })
        .await;

        self.insert(NewDataset {
            public_id: scenario::D2.to_string(),
            name: scenario::D2_NAME.to_string(),
            motifs: vec![motif(
                scenario::M3,
                "m3",
                "FooBar",
                &["BAR", "FOO"],
                vec![
                    [1.0, 0.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0, 0.0],
                    [0.0, 0.0, 1.0, 0.0],
                ],
            )],
        })
        .await;
    }

    /// Load `count` motifs named `Motif0001`.. with ids `MA0001`.. into a
    /// dataset with the given public id and name.
    pub async fn seed_bulk(&self, public_id: &str, name: &str, count: usize) {
        let motifs = (1..=count)
            .map(|i| {
                motif(
                    &format!("{}-{:04}", public_id, i),
                    &format!("MA{:04}", i),
                    &format!("Motif{:04}", i),
                    &[],
                    vec![[0.25, 0.25, 0.25, 0.25]],
                )
            })
            .collect();

        self.insert(NewDataset {
            public_id: public_id.to_string(),
            name: name.to_string(),
            motifs,
        })
        .await;
    }

    /// Insert a prepared dataset.
    pub async fn insert(&self, dataset: NewDataset) {
        insert_dataset(&self.pool, &dataset)
            .await
            .expect("Failed to seed dataset");
    }

    /// Database URL of the backing file.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

fn motif(
    public_id: &str,
    motif_id: &str,
    motif_name: &str,
    genes: &[&str],
    weights: Vec<BaseWeights>,
) -> NewMotif {
    NewMotif {
        public_id: public_id.to_string(),
        motif_id: motif_id.to_string(),
        motif_name: motif_name.to_string(),
        genes: genes.iter().map(|g| g.to_string()).collect(),
        weights,
    }
}
