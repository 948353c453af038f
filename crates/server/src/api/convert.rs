//! Document → markdown conversion endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use doclift_ingest::SourceRef;

use super::{conversion_failed, convert_upload, json_rejected, read_upload, ApiError};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ConvertUrlRequest {
    pub url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ConvertUrlResponse {
    pub source: String,
    pub markdown: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ConvertFileResponse {
    pub filename: String,
    pub markdown: String,
}

/// Convert a remote document
#[utoipa::path(
    post,
    path = "/convert-url",
    tag = "Conversion",
    request_body = ConvertUrlRequest,
    responses(
        (status = 200, description = "Converted markdown", body = ConvertUrlResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 500, description = "Conversion failed", body = String)
    )
)]
pub async fn convert_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConvertUrlRequest>, JsonRejection>,
) -> Result<Json<ConvertUrlResponse>, ApiError> {
    let Json(req) = payload.map_err(json_rejected)?;
    info!("Converting from URL: {}", req.url);

    let markdown = state
        .converter
        .convert(&SourceRef::Url(req.url.clone()))
        .await
        .map_err(|e| conversion_failed(&req.url, e))?;

    info!("URL conversion succeeded: {} chars", markdown.chars().count());
    Ok(Json(ConvertUrlResponse { source: req.url, markdown }))
}

/// Convert an uploaded document
///
/// Accepts multipart/form-data with a `file` field.
#[utoipa::path(
    post,
    path = "/convert-file",
    tag = "Conversion",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "Converted markdown", body = ConvertFileResponse),
        (status = 400, description = "Upload error", body = String),
        (status = 500, description = "Conversion failed", body = String)
    )
)]
pub async fn convert_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ConvertFileResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let filename = upload.filename.clone();
    info!("Converting file: {} ({} bytes)", filename, upload.bytes.len());

    let markdown = convert_upload(&state, upload).await?;

    info!("File conversion succeeded: {} -> {} chars", filename, markdown.chars().count());
    Ok(Json(ConvertFileResponse { filename, markdown }))
}

/// Convert an uploaded document, raw markdown response
///
/// Same as `/convert-file` but answers with `text/plain` markdown, for
/// clients that store the result without parsing JSON.
#[utoipa::path(
    post,
    path = "/convert-file-raw",
    tag = "Conversion",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "Markdown", body = String, content_type = "text/plain"),
        (status = 400, description = "Upload error", body = String),
        (status = 500, description = "Conversion failed", body = String)
    )
)]
pub async fn convert_file_raw(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<String, ApiError> {
    let upload = read_upload(multipart).await?;
    let filename = upload.filename.clone();
    info!("Converting file (raw): {}", filename);

    let markdown = convert_upload(&state, upload).await?;

    info!("Raw conversion succeeded: {} -> {} chars", filename, markdown.chars().count());
    Ok(markdown)
}
