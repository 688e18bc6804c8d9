//! # motifs-api
//!
//! HTTP surface of the motif search service.
//!
//! Routes:
//! - `GET /health`
//! - `GET /motifs/datasets?cache=`
//! - `GET /motifs/search?q=&page=&pageSize=&searchMode=&datasets=&revComp=&cache=`
//!
//! Responses wrap their payload as `{"data": ...}`; errors are
//! `{"error": "<message>"}` with status 400 for bad input and 500 otherwise.

pub mod error;
pub mod params;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::debug;

use motifs_core::{Dataset, SearchResult};
use motifs_search::MotifSearchEngine;

pub use error::ApiError;
use params::{CacheParams, ParsedQuery, SearchParams};

/// Shared handler state. The engine is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MotifSearchEngine>,
}

impl AppState {
    pub fn new(engine: MotifSearchEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/motifs/datasets", get(list_datasets))
        .route("/motifs/search", get(search_motifs))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_datasets(
    State(state): State<AppState>,
    Query(params): Query<CacheParams>,
) -> Result<Json<DataResponse<Vec<Dataset>>>, ApiError> {
    let datasets = state.engine.datasets(params.use_cache()).await?;
    Ok(Json(DataResponse { data: datasets }))
}

async fn search_motifs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<DataResponse<SearchResult>>, ApiError> {
    let search = params.parse()?;
    debug!(
        subsystem = "api",
        component = "motifs",
        op = "search",
        query = ?search.query,
        dataset_count = search.datasets.len(),
        "Search request"
    );

    let result = match &search.query {
        ParsedQuery::Terms(terms) => {
            state
                .engine
                .search(
                    terms.as_slice(),
                    search.datasets.as_slice(),
                    search.paging,
                    search.rev_comp,
                    search.use_cache,
                )
                .await?
        }
        ParsedQuery::Bool(expr) => {
            state
                .engine
                .bool_search(
                    expr,
                    search.datasets.as_slice(),
                    search.paging,
                    search.rev_comp,
                    search.use_cache,
                )
                .await?
        }
    };

    Ok(Json(DataResponse { data: result }))
}
