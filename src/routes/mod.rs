//! HTTP route handlers for the explorer API.
//!
//! - `health`: liveness, build info and counters
//! - `files`: listing and every mutating file operation under `/api/files`
//! - `search`: fuzzy name search under `/api/files/search`
//!
//! [`build_router`] assembles the routes with the full middleware stack; the
//! binary and the API tests share it.

pub mod files;
pub mod health;
pub mod search;

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{rate_limit, security_headers, validation};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cfg = state.config.clone();
    let global_limiter = state.global_limiter.clone();
    let endpoint_limiter = state.rate_limiter.clone();

    let app = Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .route("/metrics", get(health::metrics))
        .route("/api/files/home", get(files::home))
        .route("/api/files/list", get(files::list))
        .route("/api/files/mkdir", post(files::mkdir))
        .route("/api/files/rename", post(files::rename))
        .route("/api/files/delete", delete(files::delete))
        .route("/api/files/copy", post(files::copy))
        .route("/api/files/move", post(files::move_entry))
        .route("/api/files/open", post(files::open))
        .route("/api/files/trash", post(files::trash))
        .route("/api/files/search", get(search::search_files))
        .route("/api/files/content-search", get(search::content_search))
        .with_state(state)
        .layer(DefaultBodyLimit::max(validation::MAX_BODY_BYTES))
        .layer(from_fn_with_state(endpoint_limiter, rate_limit::endpoint_limit_middleware))
        .layer(from_fn(validation::validate_request_middleware))
        .layer(from_fn_with_state(global_limiter, rate_limit::rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg.clone(), security_headers::security_headers_middleware));

    if cfg.cors_permissive() {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
