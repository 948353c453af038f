pub mod chunker;
mod docx;
mod html;
mod md;
mod pdf;
mod txt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text with metadata.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For every other type, always 1.
    pub page_number: usize,
    /// The extracted text, already rendered as markdown where structure exists.
    pub text: String,
    /// Headings found on this page (MD, HTML and DOCX).
    pub headings: Vec<String>,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "docx", "html", "md", "txt"
    pub file_type: String,
    /// Extracted pages with text and metadata.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Markdown rendition of the whole document, pages separated by a blank line.
    pub fn to_markdown(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }
}

/// Lowercased extension of `filename`, or an empty string when there is none.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = file_extension(filename);
    let file_type = match ext.as_str() {
        "htm" => "html",
        "text" => "txt",
        "markdown" => "md",
        other => other,
    };

    let pages = match file_type {
        "pdf" => pdf::extract_pdf(bytes)?,
        "docx" => docx::extract_docx(bytes)?,
        "html" => html::extract_html(bytes)?,
        "txt" => txt::extract_txt(bytes)?,
        "md" => md::extract_md(bytes)?,
        "" => return Err(ExtractionError::UnsupportedType(format!("'{filename}' has no extension"))),
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}

/// Decode bytes as UTF-8, falling back to lossy conversion.
pub(crate) fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}
