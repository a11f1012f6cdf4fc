//! # Lanshelf
//!
//! A personal file server for the local network. It lists one directory at a
//! time as an HTML page, sorted by modification date or name, with best-effort
//! folder sizes, and streams files to whatever browser asks for them (typically
//! an e-reader on the same Wi-Fi).
//!
//! ## Architecture
//!
//! - **Axum** on **Tokio** for HTTP, **tower-http** `ServeDir` for file bytes
//! - **walkdir** for subtree walks, raced against a timer and cancelled via
//!   `tokio-util` cancellation tokens
//! - **maud** for the listing page
//!
//! ## Core Components
//!
//! - [`scanner`]: directory lister and deadline-bounded size aggregator
//! - [`sort`]: date and name orderings
//! - [`guard`]: confinement of request paths to the library root
//! - [`library`]: the listing and delivery services built from the above
//! - [`render`]: HTML page and size formatting
//! - [`routes`]: HTTP handlers and the router
//! - [`config`], [`error`], [`metrics`], [`middleware`], [`net`], [`state`], [`types`]

pub mod config;
pub mod error;
pub mod guard;
pub mod library;
pub mod metrics;
pub mod middleware;
pub mod net;
pub mod render;
pub mod routes;
pub mod scanner;
pub mod sort;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
