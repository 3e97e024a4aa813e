//! # Explorer Backend Library
//!
//! Local HTTP backend for a desktop file explorer. It lists directories,
//! creates, renames, deletes, copies and moves entries with file-manager
//! collision naming, opens files with the default application, and runs a
//! bounded fuzzy name search and a gitignore-aware content search.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **Tokio**: async runtime; every filesystem call runs on the blocking pool
//! - **walkdir** / **similar**: tree walks and fuzzy name scoring
//! - **ignore** / **grep-searcher**: content search over file lines
//! - **Serde**: JSON request and response bodies
//!
//! ## Core Components
//!
//! - [`fs`]: the filesystem operation layer (listing, mutation, search, content search, shell)
//! - [`config`]: layered configuration (embedded defaults, files, env)
//! - [`error`]: HTTP error type and the mapping from filesystem errors
//! - [`metrics`]: operation counters
//! - [`middleware`]: rate limiting, request validation, security headers
//! - [`routes`]: HTTP handlers and the router builder
//! - [`state`]: shared application state
//! - [`types`]: entries and request/response bodies

pub mod config;
pub mod error;
pub mod fs;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
