//! Router-level tests: the real axum `Router` driven with `oneshot`, backed by
//! an in-memory converter and vector store.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use doclift_core::config::{ServerConfig, UploadConfig};
use doclift_ingest::{
    ChunkConfig, ChunkRecord, ConversionError, Converter, SourceRef, StoreError, VectorStore,
};
use doclift_server::staging::StagingArea;
use doclift_server::{build_router, AppState};

const BOUNDARY: &str = "doclift-test-boundary";

// ── Fakes ─────────────────────────────────────────────────────────

/// Returns staged file contents verbatim; URLs under `/missing` fail.
#[derive(Default)]
struct FakeConverter {
    seen: Mutex<Vec<SourceRef>>,
}

#[async_trait]
impl Converter for FakeConverter {
    async fn convert(&self, source: &SourceRef) -> Result<String, ConversionError> {
        self.seen.lock().unwrap().push(source.clone());
        match source {
            SourceRef::File { path, .. } => Ok(tokio::fs::read_to_string(path).await?),
            SourceRef::Url(url) if url.contains("/missing") => Err(ConversionError::Status {
                status: 404,
                url: url.clone(),
            }),
            SourceRef::Url(url) => Ok(format!("# Remote\n\nFetched from {url}")),
        }
    }
}

#[derive(Default)]
struct FakeStore {
    records: Mutex<Vec<ChunkRecord>>,
    fail: bool,
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn upsert(&self, record: &ChunkRecord) -> Result<String, StoreError> {
        if self.fail {
            return Err(StoreError::Api { status: 500, body: "weaviate down".into() });
        }
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(format!("fake-{}", records.len() - 1))
    }
}

struct TestApp {
    router: Router,
    converter: Arc<FakeConverter>,
    _staging: tempfile::TempDir,
}

fn test_app(store: Option<Arc<FakeStore>>) -> TestApp {
    let staging = tempfile::tempdir().unwrap();
    let converter = Arc::new(FakeConverter::default());
    let state = AppState {
        converter: converter.clone(),
        store: store.map(|s| s as Arc<dyn VectorStore>),
        chunk_defaults: ChunkConfig::default(),
        staging: StagingArea::new(staging.path()).unwrap(),
    };
    let server = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origin: "*".into(),
    };
    let upload = UploadConfig {
        staging_dir: staging.path().to_path_buf(),
        max_upload_mb: 1,
    };
    TestApp {
        router: build_router(Arc::new(state), &server, &upload),
        converter,
        _staging: staging,
    }
}

// ── Request helpers ───────────────────────────────────────────────

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `parts`: (field name, filename for file fields, content).
fn multipart_request(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, String) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_str(&body).unwrap_or_else(|_| panic!("not JSON ({status}): {body}"));
    (status, value)
}

fn staged_paths(app: &TestApp) -> Vec<PathBuf> {
    app.converter
        .seen
        .lock()
        .unwrap()
        .iter()
        .filter_map(|s| match s {
            SourceRef::File { path, .. } => Some(path.clone()),
            SourceRef::Url(_) => None,
        })
        .collect()
}

// ── Health ────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_store_availability() {
    let app = test_app(None);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "doclift");
    assert_eq!(body["vector_store"], false);

    let app = test_app(Some(Arc::new(FakeStore::default())));
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, body) = send_json(&app, request).await;
    assert_eq!(body["vector_store"], true);
}

// ── /chunk ────────────────────────────────────────────────────────

#[tokio::test]
async fn chunk_splits_into_overlapping_windows() {
    let app = test_app(None);
    let (status, body) = send_json(
        &app,
        json_request("/chunk", json!({"markdown": "ABCDEFGHIJ", "chunk_size": 4, "overlap": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(
        body["chunks"],
        json!([
            {"index": 0, "text": "ABCD"},
            {"index": 1, "text": "CDEF"},
            {"index": 2, "text": "EFGH"},
            {"index": 3, "text": "GHIJ"},
        ])
    );
}

#[tokio::test]
async fn chunk_uses_defaults_for_missing_or_out_of_range_values() {
    let app = test_app(None);
    let text = "x".repeat(2500);
    let (status, body) = send_json(
        &app,
        json_request("/chunk", json!({"markdown": text, "chunk_size": 0, "overlap": -5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["chunks"][0]["text"].as_str().unwrap().len(), 2000);
    assert_eq!(body["chunks"][1]["text"].as_str().unwrap().len(), 700);
}

#[tokio::test]
async fn chunk_of_empty_text_is_empty() {
    let app = test_app(None);
    let (status, body) = send_json(&app, json_request("/chunk", json!({"markdown": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"chunks": [], "count": 0}));
}

#[tokio::test]
async fn chunk_rejects_overlap_not_smaller_than_size() {
    let app = test_app(None);
    let (status, body) = send(
        &app,
        json_request("/chunk", json!({"markdown": "abc", "chunk_size": 100, "overlap": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("overlap (150)"), "{body}");

    // The default overlap (200) is substituted before validation.
    let (status, _) = send(
        &app,
        json_request("/chunk", json!({"markdown": "abc", "chunk_size": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app(None);
    let request = Request::builder()
        .method("POST")
        .uri("/chunk")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"markdown\": "))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("Invalid request body"), "{body}");

    let (status, _) = send(&app, json_request("/chunk", json!({"text": "wrong field"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Conversion ────────────────────────────────────────────────────

#[tokio::test]
async fn convert_file_returns_markdown_and_removes_staged_copy() {
    let app = test_app(None);
    let (status, body) = send_json(
        &app,
        multipart_request("/convert-file", &[("file", Some("cours-java.md"), b"# Java\n\nObjets.")]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "cours-java.md");
    assert_eq!(body["markdown"], "# Java\n\nObjets.");

    let staged = staged_paths(&app);
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].extension().unwrap(), "md");
    assert!(!staged[0].exists(), "staged upload was not removed");
}

#[tokio::test]
async fn convert_file_raw_returns_plain_text() {
    let app = test_app(None);
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("/convert-file-raw", &[("file", Some("notes.txt"), b"hello")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"hello");
}

#[tokio::test]
async fn convert_file_without_file_field_is_a_bad_request() {
    let app = test_app(None);
    let (status, body) = send(
        &app,
        multipart_request("/convert-file", &[("comment", None, b"no file here")]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No file provided"), "{body}");
    assert!(staged_paths(&app).is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = test_app(None);
    let big = vec![b'a'; 2 * 1024 * 1024];
    let (status, _) = send(&app, multipart_request("/convert-file", &[("file", Some("big.txt"), &big)])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn convert_url_returns_source_and_markdown() {
    let app = test_app(None);
    let (status, body) = send_json(
        &app,
        json_request("/convert-url", json!({"url": "https://example.org/cours.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "https://example.org/cours.pdf");
    assert_eq!(body["markdown"], "# Remote\n\nFetched from https://example.org/cours.pdf");
}

#[tokio::test]
async fn conversion_failure_is_a_server_error() {
    let app = test_app(None);
    let (status, body) = send(
        &app,
        json_request("/convert-url", json!({"url": "https://example.org/missing.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Conversion failed: "), "{body}");
}

// ── Indexing ──────────────────────────────────────────────────────

#[tokio::test]
async fn index_endpoints_need_a_store() {
    let app = test_app(None);
    let (status, _) = send(
        &app,
        multipart_request("/index-file", &[("file", Some("cours.md"), b"# A\n\nbody")]),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(staged_paths(&app).is_empty());

    let (status, _) = send(&app, json_request("/index-url", json!({"url": "https://example.org/a.md"}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn index_file_stores_every_chunk_with_metadata() {
    let store = Arc::new(FakeStore::default());
    let app = test_app(Some(store.clone()));
    let text = "# Intro\nabcdefghij\n## Suite\nklmnopqrst";

    let (status, body) = send_json(
        &app,
        multipart_request(
            "/index-file",
            &[
                ("chunk_size", None, b"20"),
                ("overlap", None, b"0"),
                ("file", Some("cours.md"), text.as_bytes()),
            ],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["filename"], "cours.md");
    assert_eq!(body["count"], 2);
    assert_eq!(body["ids"], json!(["fake-0", "fake-1"]));

    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source, "cours.md");
    assert_eq!(records[0].chunk_index, 0);
    assert_eq!(records[0].section.as_deref(), Some("Intro"));
    assert_eq!(records[1].chunk_index, 1);
    assert_eq!(records[1].section.as_deref(), Some("Suite"));
    assert_eq!(records[1].content, "# Suite\nklmnopqrst");
}

#[tokio::test]
async fn index_file_rejects_non_numeric_chunk_fields() {
    let app = test_app(Some(Arc::new(FakeStore::default())));
    let (status, body) = send(
        &app,
        multipart_request(
            "/index-file",
            &[("chunk_size", None, b"big"), ("file", Some("cours.md"), b"text")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("chunk_size"), "{body}");
}

#[tokio::test]
async fn index_url_reports_store_failures() {
    let store = Arc::new(FakeStore { fail: true, ..Default::default() });
    let app = test_app(Some(store));
    let (status, body) = send(
        &app,
        json_request("/index-url", json!({"url": "https://example.org/cours.md"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("weaviate down"), "{body}");
}

#[tokio::test]
async fn index_url_stores_chunks_under_the_url() {
    let store = Arc::new(FakeStore::default());
    let app = test_app(Some(store.clone()));
    let (status, body) = send_json(
        &app,
        json_request(
            "/index-url",
            json!({"url": "https://example.org/cours.md", "chunk_size": 10, "overlap": 2}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "https://example.org/cours.md");
    let records = store.records.lock().unwrap();
    assert_eq!(body["count"], records.len());
    assert!(records.iter().all(|r| r.source == "https://example.org/cours.md"));
    assert!(records.iter().all(|r| r.section.as_deref() == Some("Remote")));
}

// ── Docs ──────────────────────────────────────────────────────────

#[tokio::test]
async fn docs_are_served() {
    let app = test_app(None);
    let request = Request::builder().uri("/docs").body(Body::empty()).unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("doclift API"));
}
