use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Operation counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub listings_served: Arc<AtomicUsize>,
    pub mutations_applied: Arc<AtomicUsize>,
    pub mutations_failed: Arc<AtomicUsize>,
    pub searches_run: Arc<AtomicUsize>,
    pub entries_scanned: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            listings_served: Arc::new(AtomicUsize::new(0)),
            mutations_applied: Arc::new(AtomicUsize::new(0)),
            mutations_failed: Arc::new(AtomicUsize::new(0)),
            searches_run: Arc::new(AtomicUsize::new(0)),
            entries_scanned: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_listings(&self) {
        self.listings_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the outcome of one mutating request.
    pub fn record_mutation(&self, ok: bool) {
        if ok {
            self.mutations_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.mutations_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_search(&self, scanned: usize) {
        self.searches_run.fetch_add(1, Ordering::Relaxed);
        self.entries_scanned.fetch_add(scanned as u64, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            listings_served: self.listings_served.load(Ordering::Relaxed),
            mutations_applied: self.mutations_applied.load(Ordering::Relaxed),
            mutations_failed: self.mutations_failed.load(Ordering::Relaxed),
            searches_run: self.searches_run.load(Ordering::Relaxed),
            entries_scanned: self.entries_scanned.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub listings_served: usize,
    pub mutations_applied: usize,
    pub mutations_failed: usize,
    pub searches_run: usize,
    pub entries_scanned: u64,
    pub uptime_seconds: u64,
}
