//! Integration tests for the transactional motif search.

use motifs_core::defaults::MAX_PAGE_SIZE;
use motifs_core::{Error, MotifStore, Paging, SearchRequest, SearchResult};
use motifs_db::test_fixtures::{scenario, TestDatabase, M1_WEIGHTS};
use motifs_db::{Database, PoolConfig};

const NO_DATASETS: &[&str] = &[];

async fn terms(db: &Database, queries: &[&str], datasets: &[&str]) -> SearchResult {
    let request = SearchRequest::terms(queries, datasets, Paging::default(), false).unwrap();
    db.search(&request).await.expect("search failed")
}

async fn boolean(db: &Database, expr: &str) -> SearchResult {
    let request = SearchRequest::boolean(expr, NO_DATASETS, Paging::default(), false).unwrap();
    db.search(&request).await.expect("bool search failed")
}

fn public_ids(result: &SearchResult) -> Vec<&str> {
    result.motifs.iter().map(|m| m.public_id.as_str()).collect()
}

#[tokio::test]
async fn test_prefix_term_matches_motif_names() {
    let test_db = TestDatabase::seeded().await;

    let result = terms(&test_db.db, &["foo"], NO_DATASETS).await;

    assert_eq!(result.total, 2);
    assert_eq!(public_ids(&result), vec![scenario::M1, scenario::M3]);
    assert_eq!(result.paging.pages, 1);
}

#[tokio::test]
async fn test_term_match_is_case_insensitive() {
    let test_db = TestDatabase::seeded().await;

    let result = terms(&test_db.db, &["FOO"], NO_DATASETS).await;

    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn test_exact_public_id_matches() {
    let test_db = TestDatabase::seeded().await;

    let result = terms(&test_db.db, &[scenario::M2], NO_DATASETS).await;

    assert_eq!(public_ids(&result), vec![scenario::M2]);
}

#[tokio::test]
async fn test_dataset_name_match_returns_its_motifs() {
    let test_db = TestDatabase::seeded().await;

    let result = terms(&test_db.db, &[scenario::D2_NAME], NO_DATASETS).await;

    assert_eq!(result.total, 1);
    assert_eq!(public_ids(&result), vec![scenario::M3]);
}

#[tokio::test]
async fn test_motif_matching_both_sides_counted_once() {
    let test_db = TestDatabase::seeded().await;

    // m1 matches by motif id and by its dataset name; m2 only by dataset.
    let result = terms(&test_db.db, &["m1", "D1"], NO_DATASETS).await;

    assert_eq!(result.total, 2);
    assert_eq!(public_ids(&result), vec![scenario::M1, scenario::M2]);
}

#[tokio::test]
async fn test_dataset_allow_list_by_name_and_public_id() {
    let test_db = TestDatabase::seeded().await;

    let by_name = terms(&test_db.db, &["foo"], &[scenario::D2_NAME]).await;
    assert_eq!(public_ids(&by_name), vec![scenario::M3]);

    let by_id = terms(&test_db.db, &["foo"], &[scenario::D1]).await;
    assert_eq!(public_ids(&by_id), vec![scenario::M1]);

    let unknown = terms(&test_db.db, &["foo"], &["nope"]).await;
    assert_eq!(unknown.total, 0);
    assert!(unknown.motifs.is_empty());
}

#[tokio::test]
async fn test_bool_and_not() {
    let test_db = TestDatabase::seeded().await;

    let result = boolean(&test_db.db, "foo AND NOT bar").await;

    assert_eq!(result.total, 1);
    assert_eq!(public_ids(&result), vec![scenario::M1]);
}

#[tokio::test]
async fn test_bool_not_excludes_every_matching_motif() {
    let test_db = TestDatabase::seeded().await;

    let result = boolean(&test_db.db, "NOT bar").await;

    assert_eq!(public_ids(&result), vec![scenario::M1]);
}

#[tokio::test]
async fn test_bool_terms_can_match_different_sides() {
    let test_db = TestDatabase::seeded().await;

    let result = boolean(&test_db.db, "(foo OR bar) AND D2").await;

    assert_eq!(public_ids(&result), vec![scenario::M3]);
}

#[tokio::test]
async fn test_bool_substring_match() {
    let test_db = TestDatabase::seeded().await;

    // "oba" only occurs inside "FooBar".
    let result = boolean(&test_db.db, "oba").await;

    assert_eq!(public_ids(&result), vec![scenario::M3]);
}

#[tokio::test]
async fn test_assembled_motif_fields() {
    let test_db = TestDatabase::seeded().await;

    let result = terms(&test_db.db, &["foobar"], NO_DATASETS).await;
    let motif = &result.motifs[0];

    assert_eq!(motif.motif_id, "m3");
    assert_eq!(motif.motif_name, "FooBar");
    assert_eq!(motif.genes, vec!["BAR", "FOO"]);
    assert_eq!(motif.dataset.public_id, scenario::D2);
    assert_eq!(motif.dataset.name, scenario::D2_NAME);
    assert_eq!(motif.dataset.motif_count, 1);
    assert_eq!(motif.weights.len(), 3);
    assert_eq!(motif.weights[0], [1.0, 0.0, 0.0, 0.0]);
}

#[tokio::test]
async fn test_reverse_complement() {
    let test_db = TestDatabase::seeded().await;

    let forward = SearchRequest::terms(&["m1"], NO_DATASETS, Paging::default(), false).unwrap();
    let reverse = SearchRequest {
        rev_comp: true,
        ..forward.clone()
    };

    let forward = test_db.db.search(&forward).await.unwrap();
    let reverse = test_db.db.search(&reverse).await.unwrap();

    assert_eq!(forward.motifs[0].weights, M1_WEIGHTS.to_vec());
    assert_eq!(
        reverse.motifs[0].weights,
        vec![[0.4, 0.3, 0.2, 0.1], [0.05, 0.15, 0.1, 0.7]]
    );
    assert_eq!(forward.total, reverse.total);
}

#[tokio::test]
async fn test_paging_windows_and_total() {
    let test_db = TestDatabase::new().await;
    test_db.seed_bulk("bulk", "Bulk", 25).await;

    let request =
        SearchRequest::terms(&["motif"], NO_DATASETS, Paging::new(3, 10), false).unwrap();
    let result = test_db.db.search(&request).await.unwrap();

    assert_eq!(result.total, 25);
    assert_eq!(result.paging.pages, 3);
    assert_eq!(result.paging.page, 3);
    let ids: Vec<&str> = result.motifs.iter().map(|m| m.motif_id.as_str()).collect();
    assert_eq!(ids, vec!["MA0021", "MA0022", "MA0023", "MA0024", "MA0025"]);
}

#[tokio::test]
async fn test_total_independent_of_page_size() {
    let test_db = TestDatabase::new().await;
    test_db.seed_bulk("bulk", "Bulk", 25).await;

    for page_size in [10, 20, 100] {
        let request =
            SearchRequest::terms(&["motif"], NO_DATASETS, Paging::new(1, page_size), false)
                .unwrap();
        let result = test_db.db.search(&request).await.unwrap();
        assert_eq!(result.total, 25);
        assert_eq!(result.motifs.len() as i64, page_size.min(25));
    }
}

#[tokio::test]
async fn test_page_past_end_is_empty() {
    let test_db = TestDatabase::new().await;
    test_db.seed_bulk("bulk", "Bulk", 25).await;

    let request =
        SearchRequest::terms(&["motif"], NO_DATASETS, Paging::new(9, 10), false).unwrap();
    let result = test_db.db.search(&request).await.unwrap();

    assert_eq!(result.total, 25);
    assert!(result.motifs.is_empty());
}

#[tokio::test]
async fn test_huge_page_number_is_empty_page() {
    let test_db = TestDatabase::seeded().await;

    let request =
        SearchRequest::terms(&["foo"], NO_DATASETS, Paging::new(i64::MAX, MAX_PAGE_SIZE), false)
            .unwrap();
    let result = test_db.db.search(&request).await.unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.paging.page, i64::MAX);
    assert_eq!(result.paging.pages, 1);
    assert!(result.motifs.is_empty());
}

#[tokio::test]
async fn test_failing_statement_is_storage_error() {
    let test_db = TestDatabase::seeded().await;
    sqlx::query("DROP TABLE weights")
        .execute(&test_db.pool)
        .await
        .unwrap();

    let request = SearchRequest::terms(&["foo"], NO_DATASETS, Paging::default(), false).unwrap();
    let err = test_db.db.search(&request).await.unwrap_err();

    assert!(matches!(err, Error::Database(_)), "got {err:?}");
    assert!(!err.is_bad_input());
}

#[tokio::test]
async fn test_closed_pool_is_storage_error() {
    let test_db = TestDatabase::seeded().await;
    test_db.pool.close().await;

    let request = SearchRequest::boolean("foo", NO_DATASETS, Paging::default(), false).unwrap();
    let err = test_db.db.search(&request).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)), "got {err:?}");

    let err = test_db.db.datasets().await.unwrap_err();
    assert!(matches!(err, Error::Database(_)), "got {err:?}");
}

#[tokio::test]
async fn test_results_ordered_by_dataset_then_motif_id() {
    let test_db = TestDatabase::seeded().await;
    test_db.seed_bulk("a-bulk", "Bulk", 2).await;

    let result = terms(&test_db.db, &["m"], NO_DATASETS).await;
    let keys: Vec<(&str, &str)> = result
        .motifs
        .iter()
        .map(|m| (m.dataset.public_id.as_str(), m.motif_id.as_str()))
        .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(result.total, 5);
}

#[tokio::test]
async fn test_search_on_read_only_pool() {
    let test_db = TestDatabase::seeded().await;
    let read_only = Database::connect_with_config(&test_db.url(), PoolConfig::new().read_only(true))
        .await
        .unwrap();

    let result = terms(&read_only, &["foo"], NO_DATASETS).await;

    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn test_list_datasets() {
    let test_db = TestDatabase::seeded().await;

    let datasets = test_db.db.datasets().await.unwrap();

    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0].name, scenario::D1_NAME);
    assert_eq!(datasets[0].motif_count, 2);
    assert_eq!(datasets[1].public_id, scenario::D2);
    assert_eq!(datasets[1].motif_count, 1);
}
