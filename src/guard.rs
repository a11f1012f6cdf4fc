//! Root containment for every externally supplied path.
//!
//! Candidates are normalized lexically (`.` and `..` folded away) and then
//! compared component-wise against the root, so `/home/user2` is not mistaken
//! for a child of `/home/user`. Symlinks inside the root are not resolved: a
//! link that points outside the root is still served. Resolving them would be
//! the next hardening step and would change which paths are reachable.

use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::middleware::validation::sanitize_for_logging;

#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: normalize(root.as_ref()) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the normalized absolute form of `candidate` if it lies within the root.
    ///
    /// Relative candidates are taken relative to the root. The root itself is accepted.
    /// Surrounding whitespace is part of the name: `a.epub ` is not `a.epub`.
    pub fn resolve(&self, candidate: &str) -> AppResult<PathBuf> {
        if candidate.trim().is_empty() || candidate.contains('\0') {
            return Err(AppError::OutsideRoot(sanitize_for_logging(candidate)));
        }
        let raw = Path::new(candidate);
        let absolute = if raw.is_absolute() { normalize(raw) } else { normalize(&self.root.join(raw)) };
        if absolute.starts_with(&self.root) {
            Ok(absolute)
        } else {
            Err(AppError::OutsideRoot(sanitize_for_logging(candidate)))
        }
    }

    /// Percent-encoded URI path of `resolved` relative to the root, e.g. `/Books/My%20Book.epub`.
    ///
    /// This is what a static file service mounted at the root expects.
    pub fn relative_uri(&self, resolved: &Path) -> AppResult<String> {
        root_relative_uri(&self.root, resolved).ok_or_else(|| AppError::OutsideRoot(resolved.display().to_string()))
    }
}

/// `path` below `root` as an encoded URI path; `/` for the root itself, `None` outside it.
pub fn root_relative_uri(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut uri = String::new();
    for comp in rel.components() {
        if let Component::Normal(part) = comp {
            uri.push('/');
            uri.push_str(&urlencoding::encode(&part.to_string_lossy()));
        }
    }
    if uri.is_empty() {
        uri.push('/');
    }
    Some(uri)
}

/// Folds `.` and `..` segments without touching the filesystem.
///
/// `..` at the filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Prefix(p) => out.push(p.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
