use std::path::{Path, PathBuf};

use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tokio::task::spawn_blocking;
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    fs::{self, FsResult},
    middleware::validation::{sanitize_for_logging, validate_file_path},
    state::AppState,
    types::{
        DirectoryListing, Entry, HomeResponse, MkdirRequest, OpenRequest, OpenResponse, PathQuery, RenameRequest,
        TransferRequest, TrashRequest,
    },
};

/// Runs one filesystem operation on the blocking pool.
pub(crate) async fn run_blocking<T, F>(op: &'static str, f: F) -> AppResult<T>
where
    F: FnOnce() -> FsResult<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow!("{} task join error: {}", op, e)))?
        .map_err(AppError::from)
}

fn checked_path(field: &str, raw: &str) -> AppResult<PathBuf> {
    validate_file_path(field, raw).map(PathBuf::from)
}

fn log_path(path: &Path) -> String {
    sanitize_for_logging(&path.to_string_lossy())
}

/// Counts the mutation and passes the result through.
fn tally<T>(state: &AppState, result: AppResult<T>) -> AppResult<T> {
    state.metrics.record_mutation(result.is_ok());
    result
}

pub async fn home() -> AppResult<impl IntoResponse> {
    let home = fs::home_directory()?;
    Ok(Json(HomeResponse { path: home.to_string_lossy().into_owned() }))
}

pub async fn list(State(state): State<AppState>, Query(q): Query<PathQuery>) -> AppResult<impl IntoResponse> {
    let dir = checked_path("path", &q.path)?;
    let shown = std::path::absolute(&dir).unwrap_or_else(|_| dir.clone());

    let entries = run_blocking("list", move || fs::list_directory(&dir)).await?;
    state.metrics.inc_listings();

    Ok(Json(DirectoryListing { path: shown.to_string_lossy().into_owned(), entries }))
}

pub async fn mkdir(State(state): State<AppState>, Json(req): Json<MkdirRequest>) -> AppResult<impl IntoResponse> {
    let parent = checked_path("path", &req.path)?;
    let name = req.name;

    let result = run_blocking("mkdir", move || fs::create_directory(&parent, &name)).await;
    let entry = tally(&state, result)?;
    info!("Created directory {}", sanitize_for_logging(&entry.path));

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn rename(State(state): State<AppState>, Json(req): Json<RenameRequest>) -> AppResult<Json<Entry>> {
    let source = checked_path("path", &req.path)?;
    let new_name = req.new_name;
    let from = log_path(&source);

    let result = run_blocking("rename", move || fs::rename(&source, &new_name)).await;
    let entry = tally(&state, result)?;
    info!("Renamed {} -> {}", from, sanitize_for_logging(&entry.path));

    Ok(Json(entry))
}

pub async fn delete(State(state): State<AppState>, Query(q): Query<PathQuery>) -> AppResult<StatusCode> {
    let target = checked_path("path", &q.path)?;
    let shown = log_path(&target);

    let result = run_blocking("delete", move || fs::delete(&target)).await;
    tally(&state, result)?;
    info!("Deleted {}", shown);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn copy(State(state): State<AppState>, Json(req): Json<TransferRequest>) -> AppResult<impl IntoResponse> {
    let source = checked_path("source", &req.source)?;
    let dest_dir = checked_path("dest_dir", &req.dest_dir)?;
    let from = log_path(&source);

    let result = run_blocking("copy", move || fs::copy(&source, &dest_dir)).await;
    let entry = tally(&state, result)?;
    info!("Copied {} -> {}", from, sanitize_for_logging(&entry.path));

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn move_entry(State(state): State<AppState>, Json(req): Json<TransferRequest>) -> AppResult<Json<Entry>> {
    let source = checked_path("source", &req.source)?;
    let dest_dir = checked_path("dest_dir", &req.dest_dir)?;
    let from = log_path(&source);

    let result = run_blocking("move", move || fs::move_entry(&source, &dest_dir)).await;
    let entry = tally(&state, result)?;
    info!("Moved {} -> {}", from, sanitize_for_logging(&entry.path));

    Ok(Json(entry))
}

pub async fn open(Json(req): Json<OpenRequest>) -> AppResult<Json<OpenResponse>> {
    let target = checked_path("path", &req.path)?;
    let shown = log_path(&target);

    run_blocking("open", move || fs::open_path(&target)).await?;
    info!("Opened {} with the default application", shown);

    Ok(Json(OpenResponse { success: true, path: req.path }))
}

pub async fn trash(State(state): State<AppState>, Json(req): Json<TrashRequest>) -> AppResult<StatusCode> {
    if req.paths.is_empty() {
        return Err(AppError::ValidationError {
            field: "paths".into(),
            message: "at least one path is required".into(),
        });
    }
    let targets = req.paths.iter().map(|p| checked_path("paths", p)).collect::<AppResult<Vec<_>>>()?;
    let count = targets.len();

    let result = run_blocking("trash", move || fs::move_to_trash(&targets)).await;
    tally(&state, result)?;
    info!("Moved {} item(s) to the trash", count);

    Ok(StatusCode::NO_CONTENT)
}
