//! Deadline-bounded folder sizing.
//!
//! Each call walks the subtree on a blocking thread and hands the total back
//! through a oneshot channel. The caller races that handoff against a timer:
//! whichever settles first wins. A walk that loses the race is cancelled so its
//! thread stops at the next entry instead of running to the end of the tree.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::{oneshot, Semaphore};
use tokio::task;
use tokio::time::{sleep_until, Duration, Instant};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct SizeAggregator {
    deadline: Duration,
    limiter: Arc<Semaphore>,
    metrics: Option<Metrics>,
}

impl SizeAggregator {
    pub fn new(deadline: Duration, concurrency: usize) -> Self {
        Self { deadline, limiter: Arc::new(Semaphore::new(concurrency.max(1))), metrics: None }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sums the sizes of all non-directory entries below `path`.
    ///
    /// Never waits longer than the deadline. A walk that misses the deadline
    /// yields 0. If `cancel` fires first, the walk stops and its partial sum is
    /// returned. Unreadable children contribute nothing.
    pub async fn aggregate(&self, path: &Path, cancel: &CancellationToken) -> u64 {
        let walk_cancel = cancel.child_token();
        let token = walk_cancel.clone();
        let limiter = self.limiter.clone();
        let metrics = self.metrics.clone();
        let root: PathBuf = path.to_path_buf();

        let walk = async move {
            // Waiting for a permit counts against the deadline too
            let permit = limiter.acquire_owned().await.ok()?;
            let (tx, rx) = oneshot::channel::<u64>();
            task::spawn_blocking(move || {
                if let Some(m) = &metrics {
                    m.walk_started();
                }
                let walk = walk_subtree(&root, &token, |_| {});
                if let Some(m) = &metrics {
                    m.walk_stopped(walk.finished);
                }
                let _ = tx.send(walk.total);
                drop(permit);
            });
            rx.await.ok()
        };

        let expires = Instant::now() + self.deadline;
        let finished = tokio::select! {
            biased;
            _ = sleep_until(expires) => None,
            // A result that lands after the deadline counts as late
            total = walk => Some(total.unwrap_or(0)).filter(|_| Instant::now() < expires),
        };

        match finished {
            Some(total) => total,
            None => {
                walk_cancel.cancel();
                if let Some(m) = &self.metrics {
                    m.inc_size_walks_timed_out();
                }
                tracing::debug!("size walk of {} exceeded {:?}", path.display(), self.deadline);
                0
            }
        }
    }
}

/// Synchronous subtree walk; stops as soon as `cancel` fires and returns what it has summed.
pub fn walk_size(root: &Path, cancel: &CancellationToken) -> u64 {
    walk_subtree(root, cancel, |_| {}).total
}

pub(crate) struct Walk {
    pub total: u64,
    /// False when the walk stopped on cancellation before visiting every entry.
    pub finished: bool,
}

/// Sums non-directory entries below `root`, calling `on_file` after each one is added.
pub(crate) fn walk_subtree(root: &Path, cancel: &CancellationToken, mut on_file: impl FnMut(u64)) -> Walk {
    let mut total = 0u64;
    for entry in WalkDir::new(root).follow_links(false) {
        if cancel.is_cancelled() {
            return Walk { total, finished: false };
        }
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(md) = entry.metadata() {
            total = total.saturating_add(md.len());
            on_file(md.len());
        }
    }
    Walk { total, finished: true }
}
