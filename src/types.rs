use std::{fmt, path::PathBuf, time::SystemTime};

use serde::{Deserialize, Serialize};

/// One file or directory of a listing snapshot.
///
/// Built fresh per request and never mutated afterwards. For directories,
/// `size_bytes` is the best-effort aggregate produced by the size walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub modified_at: SystemTime,
    pub size_bytes: u64,
    pub is_dir: bool,
}

/// Ordering strategy applied to a listing before rendering.
///
/// Only `date` and `alphabetical` are recognized; anything else parses as `Date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    #[default]
    Date,
    Alphabetical,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Alphabetical => "alphabetical",
        }
    }
}

impl From<&str> for SortMode {
    fn from(value: &str) -> Self {
        match value.trim() {
            "alphabetical" => SortMode::Alphabetical,
            _ => SortMode::Date,
        }
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        SortMode::from(value.as_str())
    }
}

impl From<SortMode> for String {
    fn from(value: SortMode) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Query strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub path: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileQuery {
    pub path: Option<String>,
}
