use std::path::PathBuf;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::files::run_blocking;
use crate::{
    error::AppResult,
    fs,
    middleware::validation::{sanitize_for_logging, validate_file_path, validate_search_query},
    state::AppState,
    types::{ContentSearchResponse, SearchResponse},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Defaults to the user's home directory.
    #[serde(default)]
    pub root: Option<String>,
    /// Falls back to `search.default_limit`; clamped to 1..=100.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ContentSearchQuery {
    pub query: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub regex: bool,
    /// Clamped to 1..=1000.
    #[serde(default)]
    pub max_results: Option<usize>,
}

fn search_root(root: Option<&str>) -> AppResult<PathBuf> {
    match root.filter(|r| !r.trim().is_empty()) {
        Some(raw) => Ok(PathBuf::from(validate_file_path("root", raw)?)),
        None => Ok(fs::home_directory()?),
    }
}

pub async fn search_files(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let query = validate_search_query(&params.query)?;
    let root = search_root(params.root.as_deref())?;
    let options = state.config.search.options(params.limit);

    debug!("Searching {} for '{}'", sanitize_for_logging(&root.to_string_lossy()), sanitize_for_logging(&query));
    let outcome = run_blocking("search", move || fs::search_with(&query, &root, &options)).await?;

    state.metrics.record_search(outcome.scanned);
    if outcome.truncated {
        debug!("Search stopped at the {} entry cap", outcome.scanned);
    }

    Ok(Json(SearchResponse { results: outcome.results }))
}

pub async fn content_search(
    State(state): State<AppState>,
    Query(params): Query<ContentSearchQuery>,
) -> AppResult<Json<ContentSearchResponse>> {
    let query = validate_search_query(&params.query)?;
    let root = search_root(params.root.as_deref())?;
    let options = fs::ContentSearchOptions {
        case_sensitive: params.case_sensitive,
        regex: params.regex,
        max_results: params.max_results.unwrap_or(fs::content_search::DEFAULT_MAX_RESULTS),
    };

    debug!(
        "Content search in {} for '{}'",
        sanitize_for_logging(&root.to_string_lossy()),
        sanitize_for_logging(&query)
    );
    let outcome = run_blocking("content search", move || fs::content_search(&query, &root, &options)).await?;

    state.metrics.record_search(outcome.files_searched);
    if outcome.truncated {
        debug!("Content search stopped at {} matches", outcome.total_matches);
    }

    Ok(Json(ContentSearchResponse {
        results: outcome.results,
        files_searched: outcome.files_searched,
        total_matches: outcome.total_matches,
        truncated: outcome.truncated,
    }))
}
