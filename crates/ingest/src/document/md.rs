use super::{decode_utf8, ExtractionError, PageContent};

/// Heading text of a markdown ATX heading line (`#` to `######` followed by a
/// space), or `None` for any other line.
pub(crate) fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let title = rest.trim().trim_end_matches('#').trim();
    if title.is_empty() { None } else { Some(title) }
}

pub fn extract_md(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = decode_utf8(bytes);

    let headings: Vec<String> = text
        .lines()
        .filter_map(heading_text)
        .map(str::to_string)
        .collect();

    Ok(vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
        headings,
    }])
}
