//! DOCX → markdown rendition from `word/document.xml`.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{ExtractionError, PageContent};

pub fn extract_docx(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::DocxError(format!("not a DOCX archive: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::DocxError(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    let (text, headings) = render_document_xml(&xml)?;
    Ok(vec![PageContent {
        page_number: 1,
        text,
        headings,
    }])
}

fn xml_error(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::DocxError(format!("malformed document.xml: {e}"))
}

/// One `<w:p>` being collected.
#[derive(Default)]
struct Paragraph {
    text: String,
    style: Option<String>,
    numbered: bool,
}

impl Paragraph {
    fn heading_level(&self) -> Option<usize> {
        heading_level(self.style.as_deref()?)
    }
}

/// Markdown level for a paragraph style: `Title` is 1, `Heading1`..`Heading6`
/// (or the French `Titre1`..`Titre6`) map to their number.
fn heading_level(style: &str) -> Option<usize> {
    let style = style.to_ascii_lowercase();
    if style == "title" {
        return Some(1);
    }
    let digits = style
        .strip_prefix("heading")
        .or_else(|| style.strip_prefix("titre"))?
        .trim();
    match digits.parse::<usize>() {
        Ok(level @ 1..=6) => Some(level),
        _ => None,
    }
}

fn style_value(e: &BytesStart) -> Result<Option<String>, ExtractionError> {
    match e.try_get_attribute("w:val").map_err(xml_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(xml_error)?.into_owned())),
        None => Ok(None),
    }
}

/// Render the body of `document.xml` as markdown, returning the text and the
/// headings encountered.
fn render_document_xml(xml: &str) -> Result<(String, Vec<String>), ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();
    let mut headings = Vec::new();

    let mut para: Option<Paragraph> = None;
    let mut in_props = false;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => para = Some(Paragraph::default()),
                b"w:pPr" => in_props = true,
                b"w:t" => in_text = true,
                b"w:pStyle" => {
                    if let Some(p) = para.as_mut() {
                        p.style = style_value(&e)?;
                    }
                }
                b"w:numPr" => {
                    if let Some(p) = para.as_mut() {
                        p.numbered = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) => match (e.name().as_ref(), para.as_mut()) {
                (b"w:pStyle", Some(p)) => p.style = style_value(&e)?,
                // Inside <w:pPr>, <w:tab> declares a tab stop rather than a tab.
                (b"w:tab", Some(p)) if !in_props => p.text.push('\t'),
                (b"w:br" | b"w:cr", Some(p)) if !in_props => p.text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = para.as_mut() {
                    p.text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:pPr" => in_props = false,
                b"w:p" => {
                    if let Some(p) = para.take() {
                        push_block(p, &mut blocks, &mut headings);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok((blocks.join("\n\n"), headings))
}

fn push_block(para: Paragraph, blocks: &mut Vec<String>, headings: &mut Vec<String>) {
    let text = para.text.trim();
    if text.is_empty() {
        return;
    }
    match para.heading_level() {
        Some(level) => {
            blocks.push(format!("{} {}", "#".repeat(level), text));
            headings.push(text.to_string());
        }
        None if para.numbered => blocks.push(format!("- {text}")),
        None => blocks.push(text.to_string()),
    }
}
