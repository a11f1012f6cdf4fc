use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request counters for the `/_/metrics` endpoint
#[derive(Clone)]
pub struct Metrics {
    pub listings_served: Arc<AtomicU64>,
    pub files_served: Arc<AtomicU64>,
    pub requests_rejected: Arc<AtomicU64>,
    pub size_walks_timed_out: Arc<AtomicU64>,
    /// Walks currently running on blocking threads.
    pub size_walks_active: Arc<AtomicU64>,
    /// Walks stopped by cancellation before reaching the end of their subtree.
    pub size_walks_cancelled: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            listings_served: Arc::new(AtomicU64::new(0)),
            files_served: Arc::new(AtomicU64::new(0)),
            requests_rejected: Arc::new(AtomicU64::new(0)),
            size_walks_timed_out: Arc::new(AtomicU64::new(0)),
            size_walks_active: Arc::new(AtomicU64::new(0)),
            size_walks_cancelled: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_listings_served(&self) {
        self.listings_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_files_served(&self) {
        self.files_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_requests_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_size_walks_timed_out(&self) {
        self.size_walks_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn walk_started(&self) {
        self.size_walks_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn walk_stopped(&self, finished: bool) {
        if !finished {
            self.size_walks_cancelled.fetch_add(1, Ordering::Relaxed);
        }
        self.size_walks_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            listings_served: self.listings_served.load(Ordering::Relaxed),
            files_served: self.files_served.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            size_walks_timed_out: self.size_walks_timed_out.load(Ordering::Relaxed),
            size_walks_active: self.size_walks_active.load(Ordering::Relaxed),
            size_walks_cancelled: self.size_walks_cancelled.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub listings_served: u64,
    pub files_served: u64,
    pub requests_rejected: u64,
    pub size_walks_timed_out: u64,
    pub size_walks_active: u64,
    pub size_walks_cancelled: u64,
    pub uptime_seconds: u64,
}
