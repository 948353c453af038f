//! Chunk configuration and output types.

use serde::Serialize;
use thiserror::Error;

/// Window size used when a request omits `chunk_size` or supplies a value ≤ 0.
pub const DEFAULT_CHUNK_SIZE: usize = 2000;
/// Overlap used when a request omits `overlap` or supplies a negative value.
pub const DEFAULT_OVERLAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("invalid chunk configuration: overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    InvalidConfiguration { chunk_size: usize, overlap: usize },
}

// ── Configuration ───────────────────────────────────────────────────────────

/// A validated window configuration: `chunk_size >= 1` and `overlap < chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    chunk_size: usize,
    overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkConfig {
    /// Validate an explicit configuration.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ChunkError> {
        if overlap >= chunk_size {
            return Err(ChunkError::InvalidConfiguration { chunk_size, overlap });
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Resolve raw request values against the built-in defaults (2000 / 200).
    pub fn resolve(chunk_size: Option<i64>, overlap: Option<i64>) -> Result<Self, ChunkError> {
        Self::default().with_overrides(chunk_size, overlap)
    }

    /// Resolve raw request values, substituting `self` for absent or
    /// out-of-range values, then validate the result.
    ///
    /// `chunk_size` ≤ 0 and negative `overlap` count as absent.
    pub fn with_overrides(
        &self,
        chunk_size: Option<i64>,
        overlap: Option<i64>,
    ) -> Result<Self, ChunkError> {
        let chunk_size = chunk_size
            .filter(|&v| v > 0)
            .map_or(self.chunk_size, saturate);
        let overlap = overlap
            .filter(|&v| v >= 0)
            .map_or(self.overlap, saturate);
        Self::new(chunk_size, overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive windows.
    pub fn step(&self) -> usize {
        super::window::step(self.chunk_size, self.overlap)
    }
}

fn saturate(v: i64) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

// ── Chunk output ────────────────────────────────────────────────────────────

/// One window of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// 0-based position in the output sequence.
    pub index: usize,
    /// The window's text.
    pub text: String,
    /// Character offset of the window start in the source text.
    #[serde(skip)]
    pub char_offset: usize,
}

/// Ordered chunks of one text, left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkResult {
    pub chunks: Vec<Chunk>,
    pub count: usize,
}

impl ChunkResult {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let count = chunks.len();
        Self { chunks, count }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|c| c.text.as_str())
    }
}
