use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::traits::{ConversionError, Converter, SourceRef};
use crate::document::{extract_text, file_extension};

/// Converter backed by the in-process extractors (PDF, DOCX, HTML, MD, TXT).
/// URLs are downloaded first, then extracted like an uploaded file.
pub struct BuiltinConverter {
    client: Client,
    max_fetch_bytes: usize,
}

impl BuiltinConverter {
    pub fn new(fetch_timeout: Duration, max_fetch_bytes: usize) -> Result<Self, ConversionError> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .user_agent(concat!("doclift/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_fetch_bytes,
        })
    }

    fn limit_mb(&self) -> usize {
        self.max_fetch_bytes / (1024 * 1024)
    }

    /// Download `raw_url`, returning the body and a filename that selects the
    /// extractor.
    async fn fetch(&self, raw_url: &str) -> Result<(Vec<u8>, String), ConversionError> {
        let url = parse_http_url(raw_url)?;

        let mut response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ConversionError::Status {
                status: response.status().as_u16(),
                url: raw_url.to_string(),
            });
        }
        if response
            .content_length()
            .is_some_and(|len| exceeds_limit(len, self.max_fetch_bytes))
        {
            return Err(ConversionError::TooLarge { limit_mb: self.limit_mb() });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_fetch_bytes {
                return Err(ConversionError::TooLarge { limit_mb: self.limit_mb() });
            }
            body.extend_from_slice(&chunk);
        }

        let filename = filename_for(&url, content_type.as_deref());
        debug!("Fetched {} ({} bytes) as '{}'", raw_url, body.len(), filename);
        Ok((body, filename))
    }
}

#[async_trait]
impl Converter for BuiltinConverter {
    async fn convert(&self, source: &SourceRef) -> Result<String, ConversionError> {
        let (bytes, filename) = match source {
            SourceRef::File { path, filename } => (tokio::fs::read(path).await?, filename.clone()),
            SourceRef::Url(url) => self.fetch(url).await?,
        };

        // Extraction is CPU-bound (pdf-extract in particular).
        let doc = tokio::task::spawn_blocking(move || extract_text(&bytes, &filename)).await??;
        let markdown = doc.to_markdown();

        info!(
            "Converted '{}' (type={}): {} page(s), {} chars",
            source.label(),
            doc.file_type,
            doc.pages.len(),
            markdown.chars().count(),
        );
        Ok(markdown)
    }
}

/// Compare a `Content-Length` against the cap without truncating on 32-bit
/// targets.
fn exceeds_limit(len: u64, limit: usize) -> bool {
    usize::try_from(len).map_or(true, |len| len > limit)
}

fn parse_http_url(raw: &str) -> Result<Url, ConversionError> {
    let url = Url::parse(raw).map_err(|e| ConversionError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConversionError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Extension implied by a `Content-Type` header value.
fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match mime.as_str() {
        "application/pdf" => Some("pdf"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "text/html" | "application/xhtml+xml" => Some("html"),
        "text/markdown" | "text/x-markdown" => Some("md"),
        "text/plain" => Some("txt"),
        _ => None,
    }
}

/// Pick a filename for a downloaded document: the last path segment when it
/// has an extension, otherwise the segment (or `document`) plus the extension
/// implied by the content type.
fn filename_for(url: &Url, content_type: Option<&str>) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut s| s.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or("document");

    if !file_extension(segment).is_empty() {
        return segment.to_string();
    }
    match content_type.and_then(extension_for_mime) {
        Some(ext) => format!("{segment}.{ext}"),
        None => segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;

    fn converter() -> BuiltinConverter {
        BuiltinConverter::new(Duration::from_secs(5), 1024).unwrap()
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/cours/java.md", get(|| async { "# Java\n\nLes classes." }))
            .route(
                "/export",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                        "<h1>Export</h1><p>Contenu</p>",
                    )
                }),
            )
            .route("/big.txt", get(|| async { "x".repeat(4096) }))
            .route("/missing.pdf", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn filename_prefers_path_extension() {
        let url = Url::parse("https://example.org/docs/cours-java.pdf?dl=1").unwrap();
        assert_eq!(filename_for(&url, Some("application/octet-stream")), "cours-java.pdf");
    }

    #[test]
    fn filename_falls_back_to_content_type() {
        let url = Url::parse("https://example.org/export").unwrap();
        assert_eq!(filename_for(&url, Some("text/html; charset=utf-8")), "export.html");
        let url = Url::parse("https://example.org/").unwrap();
        assert_eq!(filename_for(&url, Some("application/pdf")), "document.pdf");
        assert_eq!(filename_for(&url, None), "document");
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(matches!(parse_http_url("ftp://example.org/a.pdf"), Err(ConversionError::InvalidUrl { .. })));
        assert!(matches!(parse_http_url("not a url"), Err(ConversionError::InvalidUrl { .. })));
        assert!(parse_http_url("https://example.org/a.pdf").is_ok());
    }

    #[test]
    fn declared_length_is_checked_against_the_cap() {
        assert!(!exceeds_limit(1024, 1024));
        assert!(exceeds_limit(1025, 1024));
        assert!(exceeds_limit(u64::MAX, 1024));
        assert!(exceeds_limit(1 << 32, 1024));
    }

    #[tokio::test]
    async fn converts_local_file_using_original_name() {
        let mut tmp = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        tmp.write_all(b"# Titre\n\nCorps du cours.").unwrap();
        let source = SourceRef::File {
            path: tmp.path().to_path_buf(),
            filename: "cours.md".to_string(),
        };
        let markdown = converter().convert(&source).await.unwrap();
        assert_eq!(markdown, "# Titre\n\nCorps du cours.");
    }

    #[tokio::test]
    async fn unsupported_file_type_is_a_conversion_error() {
        let tmp = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let source = SourceRef::File {
            path: tmp.path().to_path_buf(),
            filename: "notes.xlsx".to_string(),
        };
        let err = converter().convert(&source).await.unwrap_err();
        assert!(matches!(err, ConversionError::Extraction(_)));
        assert_eq!(err.to_string(), "Unsupported file type: xlsx");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = SourceRef::File {
            path: "/nonexistent/doclift/file.md".into(),
            filename: "file.md".to_string(),
        };
        assert!(matches!(
            converter().convert(&source).await,
            Err(ConversionError::Io(_))
        ));
    }

    #[tokio::test]
    async fn converts_remote_documents() {
        let base = spawn_stub().await;
        let c = converter();

        let md = c.convert(&SourceRef::Url(format!("{base}/cours/java.md"))).await.unwrap();
        assert_eq!(md, "# Java\n\nLes classes.");

        let html = c.convert(&SourceRef::Url(format!("{base}/export"))).await.unwrap();
        assert_eq!(html, "# Export\n\nContenu");
    }

    #[tokio::test]
    async fn remote_failures_are_reported() {
        let base = spawn_stub().await;
        let c = converter();

        let err = c.convert(&SourceRef::Url(format!("{base}/missing.pdf"))).await.unwrap_err();
        assert!(matches!(err, ConversionError::Status { status: 404, .. }));

        let err = c.convert(&SourceRef::Url(format!("{base}/big.txt"))).await.unwrap_err();
        assert!(matches!(err, ConversionError::TooLarge { .. }));
    }
}
