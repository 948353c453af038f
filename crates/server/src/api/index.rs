//! Convert → chunk → store endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use doclift_ingest::SourceRef;

use super::{
    conversion_failed, convert_upload, index_markdown, invalid_chunking, json_rejected,
    read_upload, require_store, ApiError,
};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct IndexFileResponse {
    pub filename: String,
    pub count: usize,
    /// Store ids, in chunk order.
    pub ids: Vec<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct IndexUrlRequest {
    pub url: String,
    pub chunk_size: Option<i64>,
    pub overlap: Option<i64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IndexUrlResponse {
    pub source: String,
    pub count: usize,
    pub ids: Vec<String>,
}

/// Index an uploaded document
///
/// Multipart `file` plus optional `chunk_size` / `overlap` text fields. The
/// document is converted, chunked, and every chunk is stored with its
/// source filename, section and index.
#[utoipa::path(
    post,
    path = "/index-file",
    tag = "Indexing",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "Chunks stored", body = IndexFileResponse),
        (status = 400, description = "Upload error", body = String),
        (status = 422, description = "overlap >= chunk_size", body = String),
        (status = 500, description = "Conversion failed", body = String),
        (status = 502, description = "Vector store error", body = String),
        (status = 503, description = "Vector store not configured", body = String)
    )
)]
pub async fn index_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<IndexFileResponse>, ApiError> {
    let store = require_store(&state)?.clone();
    let upload = read_upload(multipart).await?;
    let config = state
        .chunk_defaults
        .with_overrides(upload.int_field("chunk_size")?, upload.int_field("overlap")?)
        .map_err(invalid_chunking)?;

    let filename = upload.filename.clone();
    info!("Indexing file: {}", filename);
    let markdown = convert_upload(&state, upload).await?;
    let ids = index_markdown(store.as_ref(), &filename, &markdown, &config).await?;

    info!("Indexed {}: {} chunk(s)", filename, ids.len());
    Ok(Json(IndexFileResponse { filename, count: ids.len(), ids }))
}

/// Index a remote document
#[utoipa::path(
    post,
    path = "/index-url",
    tag = "Indexing",
    request_body = IndexUrlRequest,
    responses(
        (status = 200, description = "Chunks stored", body = IndexUrlResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 422, description = "overlap >= chunk_size", body = String),
        (status = 500, description = "Conversion failed", body = String),
        (status = 502, description = "Vector store error", body = String),
        (status = 503, description = "Vector store not configured", body = String)
    )
)]
pub async fn index_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IndexUrlRequest>, JsonRejection>,
) -> Result<Json<IndexUrlResponse>, ApiError> {
    let store = require_store(&state)?.clone();
    let Json(req) = payload.map_err(json_rejected)?;
    let config = state
        .chunk_defaults
        .with_overrides(req.chunk_size, req.overlap)
        .map_err(invalid_chunking)?;

    info!("Indexing URL: {}", req.url);
    let markdown = state
        .converter
        .convert(&SourceRef::Url(req.url.clone()))
        .await
        .map_err(|e| conversion_failed(&req.url, e))?;
    let ids = index_markdown(store.as_ref(), &req.url, &markdown, &config).await?;

    info!("Indexed {}: {} chunk(s)", req.url, ids.len());
    Ok(Json(IndexUrlResponse { source: req.url, count: ids.len(), ids }))
}
