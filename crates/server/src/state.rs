use std::sync::Arc;

use doclift_ingest::{ChunkConfig, Converter, VectorStore};

use crate::staging::StagingArea;

/// Shared request context. Collaborators are injected so handlers can be
/// driven by fakes in tests.
pub struct AppState {
    pub converter: Arc<dyn Converter>,
    /// `None` when indexing is disabled; index endpoints answer 503.
    pub store: Option<Arc<dyn VectorStore>>,
    /// Applied when a request omits `chunk_size` / `overlap`.
    pub chunk_defaults: ChunkConfig,
    pub staging: StagingArea,
}
