use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::document::chunker::{section_labels, ChunkResult};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("store response did not contain an object id")]
    MissingId,
}

/// One chunk as persisted in the vector store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkRecord {
    pub content: String,
    /// Filename or URL the chunk was cut from.
    pub source: String,
    /// Nearest markdown heading at or before the chunk start.
    pub section: Option<String>,
    pub chunk_index: usize,
}

impl ChunkRecord {
    /// Build one record per chunk of `text`, labelling each with its section.
    pub fn from_chunks(source: &str, text: &str, result: &ChunkResult) -> Vec<ChunkRecord> {
        let labels = section_labels(text, result);
        result
            .chunks
            .iter()
            .zip(labels)
            .map(|(chunk, section)| ChunkRecord {
                content: chunk.text.clone(),
                source: source.to_string(),
                section,
                chunk_index: chunk.index,
            })
            .collect()
    }
}

/// Trait for vector store backends. The store embeds `content` itself.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persist a record, returning its id in the store.
    async fn upsert(&self, record: &ChunkRecord) -> Result<String, StoreError>;

    /// Persist records in order, stopping at the first failure.
    async fn upsert_all(&self, records: &[ChunkRecord]) -> Result<Vec<String>, StoreError> {
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(self.upsert(record).await?);
        }
        Ok(ids)
    }
}
