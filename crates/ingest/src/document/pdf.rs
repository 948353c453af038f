use super::{ExtractionError, PageContent};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::PdfError(
            "no extractable text (scanned or image-only PDFs are not supported)".to_string(),
        ));
    }

    // pdf-extract returns one string; form feeds separate pages.
    let pages: Vec<PageContent> = if text.contains('\x0C') {
        text.split('\x0C')
            .enumerate()
            .filter(|(_, page_text)| !page_text.trim().is_empty())
            .map(|(i, page_text)| PageContent {
                page_number: i + 1,
                text: page_text.trim().to_string(),
                headings: Vec::new(),
            })
            .collect()
    } else {
        vec![PageContent {
            page_number: 1,
            text: trimmed.to_string(),
            headings: Vec::new(),
        }]
    };

    tracing::debug!("pdf-extract produced {} page(s)", pages.len());
    Ok(pages)
}
