#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt; // for .collect()
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::guard::PathGuard;
    use crate::library::Library;
    use crate::metrics::Metrics;
    use crate::render;
    use crate::routes;
    use crate::scanner::SizeAggregator;
    use crate::state::AppState;
    use crate::tests::write_file;
    use crate::types::SortMode;

    struct TestApp {
        app: Router,
        state: AppState,
        tmp: TempDir,
    }

    fn setup_test_app() -> TestApp {
        let tmp = TempDir::new().unwrap();
        let books = tmp.path().join("books");
        fs::create_dir_all(books.join("series")).unwrap();
        write_file(&books.join("a.epub"), 1000, 200);
        write_file(&books.join("b.epub"), 2000, 100);
        write_file(&books.join(".cache"), 10, 0);
        write_file(&books.join("series/vol 1.epub"), 300, 50);

        let metrics = Metrics::new();
        let library = Library::new(
            PathGuard::new(tmp.path()),
            &books,
            SortMode::Date,
            SizeAggregator::new(Duration::from_secs(5), 4).with_metrics(metrics.clone()),
        )
        .unwrap();
        let state = AppState::new(AppConfig::default(), library, "192.168.1.20:3000".to_string(), metrics);
        let app = routes::router(state.clone());
        TestApp { app, state, tmp }
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    fn enc(p: &std::path::Path) -> String {
        urlencoding::encode(&p.to_string_lossy()).into_owned()
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/_/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/_/version").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["name"], "lanshelf");
        assert_eq!(v["library"]["default_sort"], "date");
    }

    #[tokio::test]
    async fn test_index_lists_start_dir_newest_first() {
        let t = setup_test_app();
        let (status, headers, body) = get(&t.app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("content-type").unwrap().to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers.get("cache-control").unwrap(), "no-store");

        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("192.168.1.20:3000"));
        assert!(!html.contains(".cache"));
        let a = html.find("a.epub").unwrap();
        let b = html.find("b.epub").unwrap();
        assert!(b < a, "b.epub is newer and must come first");
        assert!(html.contains("1000 Bytes"));
        assert!(html.contains("1.95 KB"));
        assert_eq!(t.state.metrics.get_snapshot().listings_served, 1);
    }

    #[tokio::test]
    async fn test_index_alphabetical_is_per_request() {
        let t = setup_test_app();
        let (_, _, body) = get(&t.app, "/?sort_by=alphabetical").await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.find("a.epub").unwrap() < html.find("b.epub").unwrap());
        assert!(html.contains("sort_by=alphabetical"));

        // the next request without sort_by is back to the default
        let (_, _, body) = get(&t.app, "/").await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.find("b.epub").unwrap() < html.find("a.epub").unwrap());
    }

    #[tokio::test]
    async fn test_index_unknown_sort_falls_back_to_date() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/?sort_by=size").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.find("b.epub").unwrap() < html.find("a.epub").unwrap());
    }

    #[tokio::test]
    async fn test_index_with_path_and_links() {
        let t = setup_test_app();
        let series = t.tmp.path().join("books/series");
        let (status, _, body) = get(&t.app, &format!("/?path={}", enc(&series))).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("vol 1.epub"));
        // download link carries the file name and the absolute path
        let link = format!("/vol%201.epub?path={}", enc(&series.join("vol 1.epub")));
        assert!(html.contains(&link));
        // parent link
        assert!(html.contains(&format!("/?path={}&amp;sort_by=date", enc(&t.tmp.path().join("books")))));
    }

    #[tokio::test]
    async fn test_index_outside_root_is_empty() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/?path=%2Fetc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(t.state.metrics.get_snapshot().requests_rejected, 1);
    }

    #[tokio::test]
    async fn test_index_missing_dir_has_no_body() {
        let t = setup_test_app();
        let missing = t.tmp.path().join("gone");
        let (status, _, body) = get(&t.app, &format!("/?path={}", enc(&missing))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_file_download_streams_bytes() {
        let t = setup_test_app();
        let file = t.tmp.path().join("books/a.epub");
        let (status, headers, body) = get(&t.app, &format!("/a.epub?path={}", enc(&file))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 1000);
        assert_eq!(headers.get("content-type").unwrap(), "application/epub+zip");
        assert_eq!(t.state.metrics.get_snapshot().files_served, 1);
    }

    #[tokio::test]
    async fn test_file_download_with_spaces() {
        let t = setup_test_app();
        let file = t.tmp.path().join("books/series/vol 1.epub");
        let (status, _, body) = get(&t.app, &format!("/vol%201.epub?path={}", enc(&file))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 300);
    }

    #[tokio::test]
    async fn test_file_outside_root_is_dropped() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/passwd?path=%2Fetc%2Fpasswd").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(t.state.metrics.get_snapshot().files_served, 0);
        assert_eq!(t.state.metrics.get_snapshot().requests_rejected, 1);
    }

    #[tokio::test]
    async fn test_file_traversal_in_query_is_dropped() {
        let t = setup_test_app();
        let sneaky = format!("{}/../../etc/passwd", t.tmp.path().display());
        let (status, _, body) = get(&t.app, &format!("/passwd?path={}", urlencoding::encode(&sneaky))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_file_without_path_is_empty() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/a.epub").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_files_named_like_endpoints_download_their_bytes() {
        let t = setup_test_app();
        let root = t.tmp.path();
        for name in ["metrics", "version", "healthz", "download"] {
            let file = root.join("books").join(name);
            write_file(&file, 777, 10);
            let href = render::download_href(root, name, &file);
            let (status, _, body) = get(&t.app, &href).await;
            assert_eq!(status, StatusCode::OK, "{}", name);
            assert_eq!(body.len(), 777, "{} via {}", name, href);
        }

        let (_, _, body) = get(&t.app, "/").await;
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("href=\"/download/books/download\""));
        assert!(html.contains(&format!("href=\"/metrics?path={}\"", enc(&root.join("books/metrics")))));
    }

    #[tokio::test]
    async fn test_trailing_space_names_are_kept() {
        let t = setup_test_app();
        let root = t.tmp.path();
        let file = root.join("books/trailing.epub ");
        write_file(&file, 777, 10);
        let href = render::download_href(root, "trailing.epub ", &file);
        assert!(href.starts_with("/trailing.epub%20?path="));
        let (status, _, body) = get(&t.app, &href).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 777);

        let shelf = root.join("books/shelf ");
        fs::create_dir_all(&shelf).unwrap();
        write_file(&shelf.join("inside.epub"), 5, 10);
        let (status, _, body) = get(&t.app, &format!("/?path={}", enc(&shelf))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("inside.epub"));
    }

    #[tokio::test]
    async fn test_download_mount_serves_root_relative() {
        let t = setup_test_app();
        let (status, _, body) = get(&t.app, "/download/books/b.epub").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 2000);
    }

    #[tokio::test]
    async fn test_download_mount_rejects_traversal() {
        let t = setup_test_app();
        let (status, _, _) = get(&t.app, "/download/../../etc/passwd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _, _) = get(&t.app, "/download/%2e%2e/%2e%2e/etc/passwd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let t = setup_test_app();
        let (status, headers, _) = get(&t.app, "/_/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key("x-content-type-options"));
        assert!(headers.contains_key("x-frame-options"));
        assert!(headers.contains_key("referrer-policy"));
        assert!(headers.contains_key("permissions-policy"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let t = setup_test_app();
        let _ = get(&t.app, "/").await;
        let (status, _, body) = get(&t.app, "/_/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(v["listings_served"], 1);
        assert!(v["uptime_seconds"].is_number());
    }
}
