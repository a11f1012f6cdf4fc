use std::cmp::Reverse;

use crate::types::{Entry, SortMode};

/// Most recently modified first. Stable, so equal timestamps keep input order.
pub fn by_modified_date(entries: &mut [Entry]) {
    entries.sort_by_key(|e| Reverse(e.modified_at));
}

/// Case-insensitive ascending by name. Stable.
pub fn by_name(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());
}

pub fn sort_by(entries: &mut [Entry], mode: SortMode) {
    match mode {
        SortMode::Date => by_modified_date(entries),
        SortMode::Alphabetical => by_name(entries),
    }
}
