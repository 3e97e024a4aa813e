use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::rate_limit::{MUTATION_KEY, SEARCH_KEY};
use crate::middleware::{EndpointRateLimiter, RateLimiter};

/// The shared application state.
///
/// Only transport concerns live here. The filesystem engines are stateless and
/// every request rebuilds its view of the disk.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Operation counters exposed at `/metrics`.
    pub metrics: Metrics,
    /// Global per-IP limit from `[rate_limit]`.
    pub global_limiter: RateLimiter,
    /// Per-endpoint rate limits for the expensive or destructive routes.
    pub rate_limiter: EndpointRateLimiter,
}

impl AppState {
    /// Creates the state with default endpoint limits:
    /// - 600 searches per minute
    /// - 300 mutations (mkdir/rename/delete/copy/move/trash) per minute
    pub fn new(config: AppConfig) -> Self {
        let global_limiter = RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window_seconds);
        let rate_limiter =
            EndpointRateLimiter::new().with_limits(vec![(SEARCH_KEY, 600, 60), (MUTATION_KEY, 300, 60)]);

        Self { config: Arc::new(config), metrics: Metrics::new(), global_limiter, rate_limiter }
    }
}
