use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Percent-decoding passes applied before inspecting segments; two catches `%252e`.
const DECODE_PASSES: usize = 2;

/// Rejects request URIs whose path contains `..` segments, in any encoding.
///
/// Query strings are not inspected: the `path` parameters are confined by the
/// path guard after decoding.
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    let uri_path = req.uri().path();
    if contains_path_traversal(uri_path) {
        tracing::warn!("Path traversal rejected: {}", sanitize_for_logging(uri_path));
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "INVALID_PATH",
                    "message": "Path traversal detected in request",
                },
                "status": 400,
            })),
        )
            .into_response();
    }

    next.run(req).await
}

fn contains_path_traversal(path: &str) -> bool {
    let mut decoded = path.to_string();
    for pass in 0..DECODE_PASSES {
        if has_dot_segment(&decoded) {
            return true;
        }
        match urlencoding::decode(&decoded) {
            Ok(next) if next != decoded => decoded = next.into_owned(),
            Ok(_) => break,
            // the request path itself must decode to UTF-8
            Err(_) if pass == 0 => return true,
            // a literal `%FF` in a file name; nothing further to unwrap
            Err(_) => break,
        }
    }
    has_dot_segment(&decoded)
}

fn has_dot_segment(path: &str) -> bool {
    path.contains('\0') || path.split(['/', '\\']).any(|seg| seg == ".." || seg == ".")
}

pub fn sanitize_for_logging(input: &str) -> String {
    // control characters out, quotes escaped, length capped
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}
