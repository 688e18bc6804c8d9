//! Query-string parsing for the motif routes.
//!
//! Every field arrives as an optional string so that malformed numbers and
//! flags fall back to defaults instead of rejecting the request.

use serde::Deserialize;

use motifs_core::defaults::{DEFAULT_PAGE, MAX_SEARCH_LEN, MIN_PAGE_SIZE, MIN_SEARCH_LEN};
use motifs_core::{sanitize_query, Paging};

use crate::error::ApiError;

/// `?q=&page=&pageSize=&searchMode=&datasets=&revComp=&cache=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search_mode: Option<String>,
    pub datasets: Option<String>,
    pub rev_comp: Option<String>,
    pub cache: Option<String>,
}

/// `?cache=`
#[derive(Debug, Default, Deserialize)]
pub struct CacheParams {
    pub cache: Option<String>,
}

impl CacheParams {
    pub fn use_cache(&self) -> bool {
        flag(self.cache.as_deref(), true)
    }
}

/// How the query text is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuery {
    /// Comma-separated prefix terms.
    Terms(Vec<String>),
    /// Whole text as a boolean expression.
    Bool(String),
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSearch {
    pub query: ParsedQuery,
    pub datasets: Vec<String>,
    pub paging: Paging,
    pub rev_comp: bool,
    pub use_cache: bool,
}

impl SearchParams {
    /// Sanitize and validate. Fails only for a query outside
    /// `MIN_SEARCH_LEN..=MAX_SEARCH_LEN` characters after sanitizing.
    pub fn parse(&self) -> Result<ParsedSearch, ApiError> {
        let q = sanitize_query(self.q.as_deref().unwrap_or_default());
        let len = q.chars().count();
        if len < MIN_SEARCH_LEN {
            return Err(ApiError::BadRequest("search too short".to_string()));
        }
        if len > MAX_SEARCH_LEN {
            return Err(ApiError::BadRequest("search too long".to_string()));
        }

        let bool_mode = self
            .search_mode
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase().starts_with('b'))
            .unwrap_or(false);

        let query = if bool_mode {
            ParsedQuery::Bool(q)
        } else {
            ParsedQuery::Terms(split_list(&q))
        };

        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= DEFAULT_PAGE)
            .unwrap_or(DEFAULT_PAGE);
        let page_size = self
            .page_size
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(MIN_PAGE_SIZE);

        Ok(ParsedSearch {
            query,
            datasets: self.datasets.as_deref().map(split_list).unwrap_or_default(),
            paging: Paging::new(page, page_size),
            rev_comp: flag(self.rev_comp.as_deref(), false),
            use_cache: flag(self.cache.as_deref(), true),
        })
    }
}

/// Split on `,`, trim, drop blanks.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "true" || v == "1" => true,
        Some(v) if v == "false" || v == "0" => false,
        _ => default,
    }
}
