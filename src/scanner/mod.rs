use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use futures::future::join_all;
use tokio::task;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::guard::normalize;
use crate::types::Entry;

mod aggregate;

pub use aggregate::{walk_size, SizeAggregator};
#[cfg(test)]
pub(crate) use aggregate::walk_subtree;

#[derive(Debug, Clone)]
struct ChildRecord {
    path: PathBuf,
    name: String,
    modified_at: SystemTime,
    len: u64,
    is_dir: bool,
}

/// Lists the immediate, non-hidden children of `dir`.
///
/// Subdirectory sizes come from `aggregator`, all walks running at once. When a
/// walk yields 0 the directory's own metadata size is reported instead, which
/// also hides genuinely empty folders behind their inode size. Order is unspecified.
pub async fn list_directory(dir: &Path, aggregator: &SizeAggregator) -> AppResult<Vec<Entry>> {
    let absolute = std::path::absolute(dir)
        .map(|p| normalize(&p))
        .map_err(|e| AppError::NotFound(format!("{}: {}", dir.display(), e)))?;

    let scan_dir = absolute.clone();
    let children = task::spawn_blocking(move || read_children(&scan_dir)).await??;

    // Reaps walks still running if this listing is dropped mid-way
    let cancel = CancellationToken::new();
    let _reaper = cancel.clone().drop_guard();

    let sizes = join_all(children.iter().map(|child| {
        let cancel = &cancel;
        async move {
            if !child.is_dir {
                return child.len;
            }
            match aggregator.aggregate(&child.path, cancel).await {
                0 => child.len,
                total => total,
            }
        }
    }))
    .await;

    let entries = children
        .into_iter()
        .zip(sizes)
        .map(|(child, size_bytes)| Entry {
            path: child.path,
            name: child.name,
            modified_at: child.modified_at,
            size_bytes,
            is_dir: child.is_dir,
        })
        .collect::<Vec<_>>();

    tracing::debug!("listed {} entries in {}", entries.len(), absolute.display());
    Ok(entries)
}

fn read_children(dir: &Path) -> AppResult<Vec<ChildRecord>> {
    let rd = fs::read_dir(dir).map_err(|e| AppError::NotFound(format!("{}: {}", dir.display(), e)))?;

    let mut out = Vec::new();
    for entry in rd.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let md = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let modified_at = match md.modified() {
            Ok(t) => t,
            Err(_) => continue,
        };
        out.push(ChildRecord {
            path: entry.path(),
            name,
            modified_at,
            len: md.len(),
            is_dir: md.is_dir(),
        });
    }
    Ok(out)
}
