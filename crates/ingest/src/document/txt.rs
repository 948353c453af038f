use super::{decode_utf8, ExtractionError, PageContent};

pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = decode_utf8(bytes);

    Ok(vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
        headings: Vec::new(),
    }])
}
