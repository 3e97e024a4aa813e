use super::ip::extract_ip_from_headers;
use crate::error::{AppError, AppResult};
use axum::{
    extract::{connect_info::ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

/// Limiter key shared by every mutating route.
pub const MUTATION_KEY: &str = "mutation";
/// Limiter key shared by name and content search.
pub const SEARCH_KEY: &str = "/api/files/search";

/// A thread-safe rate limiter based on the sliding window algorithm.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<IpAddr, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter`.
    ///
    /// # Arguments
    ///
    /// * `max_requests` - The maximum number of requests allowed within the time window.
    /// * `window_seconds` - The duration of the time window in seconds.
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Records a request from `ip`, or returns [`AppError::RateLimited`] if
    /// the window is already full.
    pub async fn check_rate_limit(&self, ip: IpAddr) -> AppResult<()> {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        let timestamps = requests.entry(ip).or_default();

        // On clock skew keep the timestamp rather than letting requests through
        timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));

        if timestamps.len() >= self.max_requests {
            let oldest = timestamps.first().copied().unwrap_or(now);
            let retry_after = match now.checked_duration_since(oldest) {
                Some(elapsed) => self.window.saturating_sub(elapsed),
                None => Duration::from_secs(1),
            };

            let retry_after_seconds = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            return Err(AppError::RateLimited { retry_after_seconds });
        }

        timestamps.push(now);
        Ok(())
    }

    /// Drops timestamps outside the window and forgets idle IPs.
    pub async fn cleanup_old_entries(&self) {
        let now = Instant::now();
        let mut requests = self.requests.write().await;

        requests.retain(|_, timestamps| {
            timestamps.retain(|&t| now.checked_duration_since(t).map(|d| d < self.window).unwrap_or(true));
            !timestamps.is_empty()
        });
    }
}

fn client_ip(req: &Request) -> IpAddr {
    let remote_ip = req.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0.ip());
    extract_ip_from_headers(req.headers(), remote_ip)
}

/// Global per-IP limit applied to every request.
pub async fn rate_limit_middleware(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    match limiter.check_rate_limit(ip).await {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Applies the per-endpoint limits configured on [`EndpointRateLimiter`].
pub async fn endpoint_limit_middleware(
    State(limiter): State<EndpointRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(key) = endpoint_key(req.method(), req.uri().path()) {
        let ip = client_ip(&req);
        if let Err(err) = limiter.check_endpoint_limit(key, ip).await {
            tracing::warn!("Rate limit hit on '{}' for {}", key, ip);
            return err.into_response();
        }
    }
    next.run(req).await
}

/// Maps a request onto its limiter key, if the route is limited.
pub fn endpoint_key(method: &Method, path: &str) -> Option<&'static str> {
    match (method, path) {
        (&Method::GET, "/api/files/search") | (&Method::GET, "/api/files/content-search") => Some(SEARCH_KEY),
        (&Method::POST, "/api/files/mkdir")
        | (&Method::POST, "/api/files/rename")
        | (&Method::POST, "/api/files/copy")
        | (&Method::POST, "/api/files/move")
        | (&Method::POST, "/api/files/trash")
        | (&Method::DELETE, "/api/files/delete") => Some(MUTATION_KEY),
        _ => None,
    }
}

/// A manager for per-endpoint rate limiters.
#[derive(Clone, Default)]
pub struct EndpointRateLimiter {
    limiters: Arc<HashMap<String, RateLimiter>>,
}

impl EndpointRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces limits as `(key, max_requests, window_seconds)`.
    pub fn with_limits(self, limits: Vec<(&str, usize, u64)>) -> Self {
        let mut map = Arc::try_unwrap(self.limiters).unwrap_or_else(|shared| (*shared).clone());
        for (endpoint, max_requests, window_seconds) in limits {
            map.insert(endpoint.to_string(), RateLimiter::new(max_requests, window_seconds));
        }
        Self { limiters: Arc::new(map) }
    }

    /// Checks the limit registered for `endpoint`; unlisted endpoints pass.
    pub async fn check_endpoint_limit(&self, endpoint: &str, ip: IpAddr) -> AppResult<()> {
        match self.limiters.get(endpoint) {
            Some(limiter) => limiter.check_rate_limit(ip).await,
            None => Ok(()),
        }
    }

    pub async fn cleanup_all(&self) {
        for limiter in self.limiters.values() {
            limiter.cleanup_old_entries().await;
        }
    }
}
