//! HTML listing page.

use std::{path::Path, time::SystemTime};

use chrono::{DateTime, Local};
use maud::{html, Markup, DOCTYPE};

use crate::guard::root_relative_uri;
use crate::library::Listing;
use crate::routes::DOWNLOAD_MOUNT;
use crate::types::SortMode;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;

/// `500 Bytes`, `2.00 KB`, `5.00 MB`.
pub fn format_size(size: u64) -> String {
    if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} Bytes", size)
    }
}

pub fn format_modified(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string()
}

fn encode_path(p: &Path) -> String {
    urlencoding::encode(&p.to_string_lossy()).into_owned()
}

pub fn listing_href(dir: &Path, sort: SortMode) -> String {
    format!("/?path={}&sort_by={}", encode_path(dir), sort)
}

/// Download link ending in the real file name, so the browser keeps the extension.
///
/// A file named like the static mount would be routed there instead of to the
/// file handler, so it is linked through the mount by its root-relative path.
pub fn download_href(root: &Path, name: &str, path: &Path) -> String {
    if DOWNLOAD_MOUNT.strip_prefix('/') == Some(name) {
        if let Some(rel) = root_relative_uri(root, path) {
            return format!("{}{}", DOWNLOAD_MOUNT, rel);
        }
    }
    format!("/{}?path={}", urlencoding::encode(name), encode_path(path))
}

pub fn listing_page(listing: &Listing, addr: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "lanshelf - " (listing.current.display().to_string()) }
                style { "body{font-family:sans-serif;margin:1em}table{border-collapse:collapse;width:100%}td,th{padding:.4em;border-bottom:1px solid #ccc;text-align:left}" }
            }
            body {
                p { "Serving on " code { "http://" (addr) } }
                h1 { (listing.current.display().to_string()) }
                p {
                    "Sort by: "
                    @for mode in [SortMode::Date, SortMode::Alphabetical] {
                        @if mode == listing.sort {
                            strong { (mode.as_str()) } " "
                        } @else {
                            a href=(listing_href(&listing.current, mode)) { (mode.as_str()) } " "
                        }
                    }
                }
                @if let Some(parent) = listing.parent() {
                    p { a href=(listing_href(parent, listing.sort)) { ".. (up)" } }
                }
                table {
                    thead {
                        tr { th { "Name" } th { "Size" } th { "Modified" } }
                    }
                    tbody {
                        @for entry in &listing.entries {
                            tr {
                                td {
                                    @if entry.is_dir {
                                        a href=(listing_href(&entry.path, listing.sort)) { (entry.name) "/" }
                                    } @else {
                                        a href=(download_href(&listing.root, &entry.name, &entry.path)) { (entry.name) }
                                    }
                                }
                                td { (format_size(entry.size_bytes)) }
                                td { (format_modified(entry.modified_at)) }
                            }
                        }
                    }
                }
                @if listing.entries.is_empty() {
                    p { em { "Nothing here." } }
                }
            }
        }
    }
}
