//! Unit and HTTP-level tests.
//!
//! - **scanner_tests**: directory listing and deadline-bounded size walks
//! - **sort_tests**: date and name orderings
//! - **guard_tests**: root containment
//! - **library_tests**: listing/delivery composition scenarios
//! - **api_tests**: the full router driven with `oneshot`
//! - **config_tests**: layered configuration loading and validation
//! - **error_tests**: error-to-response mapping
//!
//! Run a single module with `cargo test scanner_tests`.

pub mod api_tests;

use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

/// Writes `len` bytes to `path` and stamps it with `secs_ago` seconds in the past.
pub(crate) fn write_file(path: &Path, len: usize, secs_ago: u64) {
    fs::write(path, vec![b'x'; len]).unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(secs_ago);
    fs::File::options().write(true).open(path).unwrap().set_modified(mtime).unwrap();
}
