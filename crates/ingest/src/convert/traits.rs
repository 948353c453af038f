use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::ExtractionError;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("fetch returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("document exceeds the {limit_mb}MB limit")]
    TooLarge { limit_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A local (usually staged) file. `filename` is the original name and
    /// selects the extractor; `path` may carry a different, temporary name.
    File { path: PathBuf, filename: String },
    /// A remote http(s) URL.
    Url(String),
}

impl SourceRef {
    /// Human-readable identifier for logs and stored records.
    pub fn label(&self) -> &str {
        match self {
            SourceRef::File { filename, .. } => filename,
            SourceRef::Url(url) => url,
        }
    }
}

/// Trait for document converters (built-in extractors, remote services, ...).
#[async_trait]
pub trait Converter: Send + Sync {
    /// Convert the referenced document to normalized markdown text.
    async fn convert(&self, source: &SourceRef) -> Result<String, ConversionError>;
}
