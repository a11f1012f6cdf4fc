//! HTTP route handlers.
//!
//! - `files`: single-file delivery through the path guard
//! - `health`: liveness, version and counters
//! - `listing`: the HTML directory listing
//!
//! [`router`] wires them together with the `/download` static mount and the
//! middleware stack, so tests and `main` serve the same application.
//!
//! Every single-segment path other than `/` and `/download` belongs to
//! `GET /{name}`, so the operational endpoints live under `/_/`.

use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware;
use crate::state::AppState;

pub mod files;
pub mod health;
pub mod listing;

/// Static mount serving the library root by root-relative path.
pub const DOWNLOAD_MOUNT: &str = "/download";

pub fn router(state: AppState) -> Router {
    let download = ServeDir::new(state.library.guard().root()).append_index_html_on_directories(false);
    let cfg = state.config.clone();

    Router::new()
        .route("/", get(listing::index))
        .route("/_/healthz", get(health::healthz))
        .route("/_/version", get(health::version))
        .route("/_/metrics", get(health::metrics))
        .route("/{name}", get(files::serve_file))
        .nest_service(DOWNLOAD_MOUNT, download)
        .with_state(state)
        .layer(from_fn(middleware::validation::validate_request_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg, middleware::security_headers::security_headers_middleware))
}
