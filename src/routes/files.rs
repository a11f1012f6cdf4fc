use axum::{
    extract::{Path, Query, Request, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::{
    error::{AppError, AppResult},
    middleware::validation::sanitize_for_logging,
    state::AppState,
    types::FileQuery,
};

/// `GET /{name}?path=<absolute file path>`
///
/// `name` is only there so e-reader browsers see the file extension in the URL;
/// the file comes from `path`. The request is rewritten to a root-relative URI
/// and handed to a `ServeDir` rooted at the library root, so nothing outside
/// the root is reachable even if the guard were bypassed.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(q): Query<FileQuery>,
    req: Request,
) -> AppResult<Response> {
    let requested = match q.path.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(p) => p,
        None => {
            tracing::debug!("file request for {} without path", sanitize_for_logging(&name));
            return Ok(StatusCode::OK.into_response());
        }
    };

    let target = match state.library.delivery_uri(requested) {
        Ok(uri) => uri,
        Err(e) => {
            if matches!(e, AppError::OutsideRoot(_)) {
                state.metrics.inc_requests_rejected();
            }
            return Err(e);
        }
    };
    let target: Uri = target
        .parse()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid delivery uri {}: {}", target, e)))?;

    let (mut parts, body) = req.into_parts();
    parts.uri = target;
    let req = Request::from_parts(parts, body);

    let res = match ServeDir::new(state.library.guard().root()).oneshot(req).await {
        Ok(res) => res,
        Err(never) => match never {},
    };
    if res.status().is_success() {
        state.metrics.inc_files_served();
    }
    Ok(res.into_response())
}
