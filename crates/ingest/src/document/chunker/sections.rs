//! Markdown section labels for chunks.
//!
//! Each chunk is labelled with the heading in effect where it starts. Chunk
//! boundaries are never moved to follow headings.

use super::types::ChunkResult;
use crate::document::md::heading_text;

/// `(char_offset, title)` of every markdown heading outside fenced code.
fn heading_offsets(text: &str) -> Vec<(usize, String)> {
    let mut headings = Vec::new();
    let mut offset = 0usize;
    // Run of backticks or tildes that opened the current fence.
    let mut fence: Option<&str> = None;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(run) = fence_run(trimmed) {
            match fence {
                None => fence = Some(run),
                Some(open) if run.starts_with(open) => fence = None,
                Some(_) => {}
            }
        } else if fence.is_none() {
            if let Some(title) = heading_text(line.trim_end_matches(['\n', '\r'])) {
                headings.push((offset, title.to_string()));
            }
        }
        offset += line.chars().count();
    }
    headings
}

/// Leading run of three or more backticks or tildes.
fn fence_run(line: &str) -> Option<&str> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.len() - line.trim_start_matches(marker).len();
    (len >= 3).then(|| &line[..len])
}

/// For every chunk, the last heading starting at or before the chunk's first
/// character; `None` before the first heading.
pub fn section_labels(text: &str, result: &ChunkResult) -> Vec<Option<String>> {
    let headings = heading_offsets(text);
    result
        .chunks
        .iter()
        .map(|chunk| {
            let upto = headings.partition_point(|(offset, _)| *offset <= chunk.char_offset);
            upto.checked_sub(1).map(|i| headings[i].1.clone())
        })
        .collect()
}
