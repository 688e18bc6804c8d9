//! Domain models for motif search.
//!
//! All types serialize to camelCase JSON, matching the wire format consumed by
//! the motif browser front end.

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_PAGE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::query::{parse_bool_query, BoolExpr};

// =============================================================================
// DATASETS & MOTIFS
// =============================================================================

/// A named grouping of motifs, e.g. a JASPAR release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub public_id: String,
    pub name: String,
    pub motif_count: i64,
}

/// Frequencies for one motif position in canonical base order `A, C, G, T`.
pub type BaseWeights = [f64; 4];

/// A position-weight matrix with its identity columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motif {
    pub public_id: String,
    pub dataset: Dataset,
    pub motif_id: String,
    pub motif_name: String,
    pub genes: Vec<String>,
    /// One entry per position, ordered by increasing position.
    pub weights: Vec<BaseWeights>,
}

// =============================================================================
// PAGING
// =============================================================================

/// Page selection for a search, plus the derived page count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub page: i64,
    pub page_size: i64,
    /// `ceil(total / page_size)`, filled in once the total is known.
    #[serde(default)]
    pub pages: i64,
}

impl Paging {
    /// Create a clamped page selection.
    ///
    /// `page` is raised to at least 1 and `page_size` is clamped into
    /// `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(DEFAULT_PAGE),
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            pages: 0,
        }
    }

    /// Re-apply the clamping rules, e.g. after deserializing caller input.
    pub fn clamped(self) -> Self {
        Self::new(self.page, self.page_size)
    }

    /// Number of rows to skip for this page. Saturates at `i64::MAX`, which
    /// lies past the end of any result.
    pub fn offset(&self) -> i64 {
        self.page_size.saturating_mul(self.page.saturating_sub(1))
    }

    /// Copy of this paging with `pages` derived from `total`.
    pub fn with_total(self, total: i64) -> Self {
        Self {
            pages: page_count(total, self.page_size),
            ..self
        }
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, MIN_PAGE_SIZE)
    }
}

/// `ceil(total / page_size)`; zero for an empty result.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

// =============================================================================
// SEARCH
// =============================================================================

/// One page of matching motifs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub paging: Paging,
    pub motifs: Vec<Motif>,
    /// Matches across all datasets and pages, independent of page size.
    pub total: i64,
}

/// Search mode, used in logs and cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// OR-combined prefix terms.
    Terms,
    /// Boolean expression.
    Bool,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Terms => "terms",
            SearchMode::Bool => "bool",
        }
    }
}

/// The query half of a search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotifQuery {
    /// Raw search strings, each prefix-matched, OR-combined.
    Terms(Vec<String>),
    /// Parsed boolean expression.
    Bool(BoolExpr),
}

impl MotifQuery {
    pub fn mode(&self) -> SearchMode {
        match self {
            MotifQuery::Terms(_) => SearchMode::Terms,
            MotifQuery::Bool(_) => SearchMode::Bool,
        }
    }

    /// Normalized query text: sorted terms joined by `,`, or the canonical
    /// rendering of the expression.
    pub fn normalized(&self) -> String {
        match self {
            MotifQuery::Terms(terms) => terms.join(","),
            MotifQuery::Bool(expr) => expr.to_string(),
        }
    }
}

/// Fully validated search input handed to storage.
///
/// Constructors trim, de-duplicate and sort the term and dataset lists so that
/// logically identical requests compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: MotifQuery,
    pub datasets: Vec<String>,
    pub paging: Paging,
    pub rev_comp: bool,
}

impl SearchRequest {
    /// Build a term-list request. Fails with `EmptyScope` when no non-blank
    /// term remains.
    pub fn terms<S: AsRef<str>, D: AsRef<str>>(
        queries: &[S],
        datasets: &[D],
        paging: Paging,
        rev_comp: bool,
    ) -> Result<Self> {
        let terms = normalize_list(queries);
        if terms.is_empty() {
            return Err(Error::EmptyScope("no search terms supplied".to_string()));
        }

        Ok(Self {
            query: MotifQuery::Terms(terms),
            datasets: normalize_list(datasets),
            paging: paging.clamped(),
            rev_comp,
        })
    }

    /// Build a boolean-expression request. Fails with `EmptyScope` for a
    /// blank expression and `QueryParse` for a malformed one.
    pub fn boolean<D: AsRef<str>>(
        expr: &str,
        datasets: &[D],
        paging: Paging,
        rev_comp: bool,
    ) -> Result<Self> {
        let expr = parse_bool_query(expr)?;

        Ok(Self {
            query: MotifQuery::Bool(expr),
            datasets: normalize_list(datasets),
            paging: paging.clamped(),
            rev_comp,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.query.mode()
    }
}

/// Trim, drop blanks, sort and de-duplicate.
fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut out: Vec<String> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    out.sort();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_clamps_page() {
        assert_eq!(Paging::new(0, 20).page, 1);
        assert_eq!(Paging::new(-5, 20).page, 1);
        assert_eq!(Paging::new(3, 20).page, 3);
    }

    #[test]
    fn test_paging_clamps_page_size() {
        assert_eq!(Paging::new(1, 0).page_size, MIN_PAGE_SIZE);
        assert_eq!(Paging::new(1, -1).page_size, MIN_PAGE_SIZE);
        assert_eq!(Paging::new(1, 10_000).page_size, MAX_PAGE_SIZE);
        assert_eq!(Paging::new(1, 25).page_size, 25);
    }

    #[test]
    fn test_paging_offset() {
        assert_eq!(Paging::new(1, 10).offset(), 0);
        assert_eq!(Paging::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_paging_offset_saturates() {
        assert_eq!(Paging::new(i64::MAX, MAX_PAGE_SIZE).offset(), i64::MAX);
        assert_eq!(Paging::new(i64::MAX / 2, MIN_PAGE_SIZE).offset(), i64::MAX);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(1000, 100), 10);
    }

    #[test]
    fn test_page_count_matches_ceiling_for_ranges() {
        for size in 1..=15 {
            for total in 0..=100 {
                let expected = (total as f64 / size as f64).ceil() as i64;
                assert_eq!(page_count(total, size), expected, "total={total} size={size}");
            }
        }
    }

    #[test]
    fn test_with_total_keeps_selection() {
        let paging = Paging::new(2, 10).with_total(35);
        assert_eq!(paging.page, 2);
        assert_eq!(paging.page_size, 10);
        assert_eq!(paging.pages, 4);
    }

    #[test]
    fn test_terms_request_normalizes() {
        let req = SearchRequest::terms(
            &[" foo ", "bar", "foo", ""],
            &["d2", "d1", "d1"],
            Paging::new(0, 5),
            false,
        )
        .unwrap();

        assert_eq!(
            req.query,
            MotifQuery::Terms(vec!["bar".to_string(), "foo".to_string()])
        );
        assert_eq!(req.datasets, vec!["d1".to_string(), "d2".to_string()]);
        assert_eq!(req.paging, Paging::new(1, MIN_PAGE_SIZE));
    }

    #[test]
    fn test_terms_request_empty_is_empty_scope() {
        let empty: [&str; 0] = [];
        let err = SearchRequest::terms(&empty, &empty, Paging::default(), false).unwrap_err();
        assert!(matches!(err, Error::EmptyScope(_)));

        let err = SearchRequest::terms(&["  ", ""], &empty, Paging::default(), false).unwrap_err();
        assert!(matches!(err, Error::EmptyScope(_)));
    }

    #[test]
    fn test_bool_request_empty_is_empty_scope() {
        let empty: [&str; 0] = [];
        let err = SearchRequest::boolean("   ", &empty, Paging::default(), false).unwrap_err();
        assert!(matches!(err, Error::EmptyScope(_)));
    }

    #[test]
    fn test_bool_request_parse_error() {
        let empty: [&str; 0] = [];
        let err = SearchRequest::boolean("foo AND", &empty, Paging::default(), false).unwrap_err();
        assert!(matches!(err, Error::QueryParse(_)));
    }

    #[test]
    fn test_normalized_query_text() {
        let empty: [&str; 0] = [];
        let req = SearchRequest::terms(&["b", "a"], &empty, Paging::default(), false).unwrap();
        assert_eq!(req.query.normalized(), "a,b");
        assert_eq!(req.mode(), SearchMode::Terms);

        let req =
            SearchRequest::boolean("foo   and not  bar", &empty, Paging::default(), true).unwrap();
        assert_eq!(req.query.normalized(), "foo AND NOT bar");
        assert_eq!(req.mode(), SearchMode::Bool);
    }

    #[test]
    fn test_motif_json_is_camel_case() {
        let motif = Motif {
            public_id: "p1".to_string(),
            dataset: Dataset {
                public_id: "d1".to_string(),
                name: "JASPAR".to_string(),
                motif_count: 1,
            },
            motif_id: "MA0001.1".to_string(),
            motif_name: "AGL3".to_string(),
            genes: vec!["AGL3".to_string()],
            weights: vec![[0.1, 0.2, 0.3, 0.4]],
        };

        let json = serde_json::to_value(&motif).unwrap();
        assert_eq!(json["publicId"], "p1");
        assert_eq!(json["motifId"], "MA0001.1");
        assert_eq!(json["motifName"], "AGL3");
        assert_eq!(json["dataset"]["motifCount"], 1);
        assert_eq!(json["weights"][0][3], 0.4);
    }

    #[test]
    fn test_search_result_json() {
        let result = SearchResult {
            paging: Paging::new(1, 10).with_total(3),
            motifs: vec![],
            total: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["paging"]["pageSize"], 10);
        assert_eq!(json["paging"]["pages"], 1);
        assert_eq!(json["total"], 3);
    }
}
