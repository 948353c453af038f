//! Server startup: shared state construction and the listen loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use doclift_core::Config;
use doclift_ingest::{BuiltinConverter, ChunkConfig, VectorStore, WeaviateStore};

use crate::router::build_router;
use crate::staging::StagingArea;
use crate::state::AppState;

/// Build `AppState` from configuration.
pub fn build_app_state(config: &Config) -> anyhow::Result<AppState> {
    let converter = BuiltinConverter::new(
        Duration::from_secs(config.converter.fetch_timeout_secs),
        config.converter.max_fetch_bytes(),
    )
    .context("failed to build HTTP client for the converter")?;

    let chunk_defaults = ChunkConfig::resolve(
        Some(config.chunking.chunk_size),
        Some(config.chunking.overlap),
    )
    .context("CHUNK_SIZE / CHUNK_OVERLAP are inconsistent")?;

    let staging = StagingArea::new(&config.upload.staging_dir).with_context(|| {
        format!("cannot create staging dir {}", config.upload.staging_dir.display())
    })?;

    Ok(AppState {
        converter: Arc::new(converter),
        store: build_store(config),
        chunk_defaults,
        staging,
    })
}

fn build_store(config: &Config) -> Option<Arc<dyn VectorStore>> {
    let wv = &config.weaviate;
    if !wv.is_configured() {
        if wv.enabled {
            warn!("WEAVIATE_ENABLED is set but GEMINI_API_KEY is missing, indexing disabled");
        } else {
            info!("Vector store disabled (WEAVIATE_ENABLED=false), /index-* will answer 503");
        }
        return None;
    }
    info!("Vector store: Weaviate at {} (collection '{}')", wv.url, wv.collection);
    let store = WeaviateStore::new(&wv.url, &wv.collection)
        .with_api_key(wv.api_key.clone())
        .with_gemini_key(wv.gemini_api_key.clone());
    Some(Arc::new(store))
}

/// Start the HTTP service and block until it exits.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(build_app_state(config)?);
    let app = build_router(state, &config.server, &config.upload);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!("doclift listening on http://{} (docs at /docs)", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
