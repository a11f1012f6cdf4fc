//! Request-facing composition of the guard, the lister and the sorter.

use std::path::{Path, PathBuf};

use tokio::time::Duration;

use crate::config::{self, AppConfig};
use crate::error::{AppError, AppResult};
use crate::guard::PathGuard;
use crate::metrics::Metrics;
use crate::scanner::{list_directory, SizeAggregator};
use crate::sort::sort_by;
use crate::types::{Entry, SortMode};

/// A sorted directory snapshot ready for rendering.
#[derive(Debug, Clone)]
pub struct Listing {
    pub root: PathBuf,
    pub current: PathBuf,
    pub sort: SortMode,
    pub entries: Vec<Entry>,
}

impl Listing {
    /// Parent directory link target, `None` when already at the root.
    pub fn parent(&self) -> Option<&Path> {
        if self.current == self.root {
            return None;
        }
        self.current.parent().filter(|p| p.starts_with(&self.root))
    }
}

#[derive(Clone)]
pub struct Library {
    guard: PathGuard,
    start_dir: PathBuf,
    default_sort: SortMode,
    aggregator: SizeAggregator,
}

impl Library {
    pub fn new(
        guard: PathGuard,
        start_dir: &Path,
        default_sort: SortMode,
        aggregator: SizeAggregator,
    ) -> AppResult<Self> {
        let start_dir = guard.resolve(&start_dir.to_string_lossy())?;
        Ok(Self { guard, start_dir, default_sort, aggregator })
    }

    /// Builds the library from configuration: canonical root, checked start directory.
    pub fn from_config(cfg: &AppConfig, metrics: Metrics) -> anyhow::Result<Self> {
        let root = config::resolve_root(&cfg.library)?;
        let guard = PathGuard::new(&root);
        let start = config::start_dir_candidate(&cfg.library, &root);
        let aggregator = SizeAggregator::new(
            Duration::from_millis(cfg.listing.size_deadline_ms),
            cfg.listing.walk_concurrency,
        )
        .with_metrics(metrics);
        let library = Self::new(guard, &start, cfg.library.default_sort, aggregator)
            .map_err(|_| anyhow::anyhow!("library.start_dir {} is outside the root", start.display()))?;
        if !library.start_dir.is_dir() {
            return Err(anyhow::anyhow!("library.start_dir {} is not a directory", library.start_dir.display()));
        }
        Ok(library)
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    pub fn start_dir(&self) -> &Path {
        &self.start_dir
    }

    pub fn default_sort(&self) -> SortMode {
        self.default_sort
    }

    /// Guard, list, sort. A missing or empty `requested` lists the start directory.
    pub async fn listing(&self, requested: Option<&str>, sort: SortMode) -> AppResult<Listing> {
        let current = match requested.filter(|s| !s.trim().is_empty()) {
            Some(p) => self.guard.resolve(p)?,
            None => self.start_dir.clone(),
        };
        let mut entries = list_directory(&current, &self.aggregator).await?;
        sort_by(&mut entries, sort);
        Ok(Listing { root: self.guard.root().to_path_buf(), current, sort, entries })
    }

    /// URI path, relative to the root, under which a static file service finds `requested`.
    pub fn delivery_uri(&self, requested: &str) -> AppResult<String> {
        let resolved = self.guard.resolve(requested)?;
        if resolved == self.guard.root() {
            return Err(AppError::NotFound("root is not a file".to_string()));
        }
        self.guard.relative_uri(&resolved)
    }
}
