//! Endpoint modules and the plumbing they share: error mapping, multipart
//! upload reading, and the convert → chunk → store pipeline steps.

mod chunk;
mod convert;
pub mod doc;
mod health;
mod index;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::Multipart;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use tracing::{error, warn};

use doclift_ingest::{chunk_text, ChunkConfig, ChunkError, ChunkRecord, ConversionError, VectorStore};

use crate::state::AppState;

pub use chunk::chunk;
pub use convert::{convert_file, convert_file_raw, convert_url};
pub use health::health;
pub use index::{index_file, index_url};

/// Error half of every handler result.
pub type ApiError = (StatusCode, String);

// ── Error mapping ────────────────────────────────────────────────

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, message.into())
}

pub(crate) fn json_rejected(rejection: JsonRejection) -> ApiError {
    bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

pub(crate) fn invalid_chunking(e: ChunkError) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}

pub(crate) fn conversion_failed(source: &str, e: ConversionError) -> ApiError {
    error!("Conversion failed: {} ({})", source, e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Conversion failed: {e}"))
}

/// 503 unless a vector store is configured.
pub(crate) fn require_store(state: &AppState) -> Result<&Arc<dyn VectorStore>, ApiError> {
    state.store.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Vector store not configured (set WEAVIATE_ENABLED and GEMINI_API_KEY)".to_string(),
    ))
}

// ── Multipart uploads ────────────────────────────────────────────

/// A multipart request carrying one `file` field and optional text fields.
pub(crate) struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub fields: HashMap<String, String>,
}

impl Upload {
    /// Integer text field; absent or blank is `None`.
    pub fn int_field(&self, name: &str) -> Result<Option<i64>, ApiError> {
        match self.fields.get(name).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| bad_request(format!("'{name}' must be an integer, got '{v}'"))),
        }
    }
}

pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut fields = HashMap::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((e.status(), format!("Multipart error: {}", e.body_text()))),
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or("unnamed").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| (e.status(), format!("Failed to read file: {}", e.body_text())))?;
            file = Some((filename, bytes.to_vec()));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| (e.status(), format!("Failed to read field '{name}': {}", e.body_text())))?;
            fields.insert(name, value);
        }
    }

    let (filename, bytes) = file.ok_or_else(|| bad_request("No file provided (expected a 'file' field)"))?;
    Ok(Upload { filename, bytes, fields })
}

// ── Pipeline steps ───────────────────────────────────────────────

/// Stage the upload, convert it, and remove the staged copy whatever the outcome.
pub(crate) async fn convert_upload(state: &AppState, upload: Upload) -> Result<String, ApiError> {
    let staged = state
        .staging
        .stage(&upload.filename, upload.bytes)
        .await
        .map_err(|e| {
            error!("Failed to stage '{}': {}", upload.filename, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to stage upload: {e}"))
        })?;

    let result = state.converter.convert(&staged.source()).await;
    staged.remove();
    result.map_err(|e| conversion_failed(&upload.filename, e))
}

/// Chunk `markdown` and store every chunk. All-or-error: the first store
/// failure aborts the request.
pub(crate) async fn index_markdown(
    store: &dyn VectorStore,
    source: &str,
    markdown: &str,
    config: &ChunkConfig,
) -> Result<Vec<String>, ApiError> {
    let chunks = chunk_text(markdown, config);
    if chunks.is_empty() {
        warn!("'{}' converted to empty text, nothing to index", source);
    }
    let records = ChunkRecord::from_chunks(source, markdown, &chunks);
    store.upsert_all(&records).await.map_err(|e| {
        error!("Indexing '{}' failed: {}", source, e);
        (StatusCode::BAD_GATEWAY, format!("Vector store error: {e}"))
    })
}
