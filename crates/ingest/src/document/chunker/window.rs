//! The sliding window itself.

use super::types::{Chunk, ChunkConfig, ChunkError, ChunkResult};

/// Window step. Floors at 1 so the loop always advances, even for a
/// configuration that bypassed validation.
pub(crate) fn step(chunk_size: usize, overlap: usize) -> usize {
    if chunk_size > overlap {
        chunk_size - overlap
    } else {
        1
    }
}

/// Character ranges `[start, end)` of every window over a text of `len`
/// characters. Empty for `len == 0`.
pub(crate) fn window_bounds(len: usize, chunk_size: usize, overlap: usize) -> Vec<(usize, usize)> {
    let step = step(chunk_size, overlap);
    let mut bounds = Vec::with_capacity(len / step + 1);
    let mut start = 0usize;

    while start < len {
        let end = start.saturating_add(chunk_size).min(len);
        bounds.push((start, end));
        if start.saturating_add(chunk_size) >= len {
            break;
        }
        start += step;
    }
    bounds
}

/// Split `text` into overlapping windows of `config.chunk_size()` characters.
pub fn chunk_text(text: &str, config: &ChunkConfig) -> ChunkResult {
    // Byte offset of every char boundary, plus the end of the string.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = boundaries.len() - 1;

    let chunks = window_bounds(len, config.chunk_size(), config.overlap())
        .into_iter()
        .enumerate()
        .map(|(index, (start, end))| Chunk {
            index,
            text: text[boundaries[start]..boundaries[end]].to_string(),
            char_offset: start,
        })
        .collect();

    ChunkResult::new(chunks)
}

/// Resolve defaults, validate, then chunk. `None`, a `chunk_size` ≤ 0 or a
/// negative `overlap` fall back to 2000 / 200.
pub fn chunk(
    text: &str,
    chunk_size: Option<i64>,
    overlap: Option<i64>,
) -> Result<ChunkResult, ChunkError> {
    let config = ChunkConfig::resolve(chunk_size, overlap)?;
    Ok(chunk_text(text, &config))
}
