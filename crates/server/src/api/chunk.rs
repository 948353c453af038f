use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use doclift_ingest::{chunk_text, Chunk, ChunkResult};

use super::{invalid_chunking, json_rejected, ApiError};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChunkRequest {
    pub markdown: String,
    /// Characters per chunk; absent or ≤ 0 uses the service default.
    pub chunk_size: Option<i64>,
    /// Characters shared by consecutive chunks; absent or < 0 uses the service default.
    pub overlap: Option<i64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChunkView {
    pub index: usize,
    pub text: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChunkResponse {
    pub chunks: Vec<ChunkView>,
    pub count: usize,
}

impl From<ChunkResult> for ChunkResponse {
    fn from(result: ChunkResult) -> Self {
        let chunks = result
            .chunks
            .into_iter()
            .map(|Chunk { index, text, .. }| ChunkView { index, text })
            .collect();
        Self { chunks, count: result.count }
    }
}

/// Split text into overlapping windows
#[utoipa::path(
    post,
    path = "/chunk",
    tag = "Chunking",
    request_body = ChunkRequest,
    responses(
        (status = 200, description = "Ordered chunks", body = ChunkResponse),
        (status = 400, description = "Malformed request", body = String),
        (status = 422, description = "overlap >= chunk_size", body = String)
    )
)]
pub async fn chunk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChunkRequest>, JsonRejection>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let Json(req) = payload.map_err(json_rejected)?;
    let config = state
        .chunk_defaults
        .with_overrides(req.chunk_size, req.overlap)
        .map_err(invalid_chunking)?;

    let result = chunk_text(&req.markdown, &config);
    info!(
        "Chunked {} chars into {} chunk(s) (size={}, overlap={})",
        req.markdown.chars().count(),
        result.count,
        config.chunk_size(),
        config.overlap(),
    );
    Ok(Json(result.into()))
}
