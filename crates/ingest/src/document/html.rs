//! HTML → markdown rendition: headings, paragraphs, list items, code blocks.

use scraper::{ElementRef, Html, Selector};

use super::{decode_utf8, ExtractionError, PageContent};

const BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "pre", "blockquote"];

pub fn extract_html(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let html = decode_utf8(bytes);
    let doc = Html::parse_document(&html);

    let mut blocks: Vec<String> = Vec::new();
    let mut headings: Vec<String> = Vec::new();

    if let Ok(sel) = Selector::parse(&BLOCK_TAGS.join(", ")) {
        for el in doc.select(&sel) {
            // Blocks nested in another block are rendered by their parent.
            if has_block_ancestor(&el) {
                continue;
            }
            let tag = el.value().name();
            match tag {
                "pre" => {
                    let code = el.text().collect::<String>();
                    let code = code.trim_matches('\n');
                    if !code.trim().is_empty() {
                        blocks.push(format!("```\n{code}\n```"));
                    }
                }
                _ => {
                    let text = normalize(&el.text().collect::<String>());
                    if text.is_empty() {
                        continue;
                    }
                    match heading_level(tag) {
                        Some(level) => {
                            blocks.push(format!("{} {}", "#".repeat(level), text));
                            headings.push(text);
                        }
                        None if tag == "li" => blocks.push(format!("- {text}")),
                        None if tag == "blockquote" => blocks.push(format!("> {text}")),
                        None => blocks.push(text),
                    }
                }
            }
        }
    }

    let text = if blocks.is_empty() {
        body_text(&doc)
    } else {
        blocks.join("\n\n")
    };

    Ok(vec![PageContent {
        page_number: 1,
        text,
        headings,
    }])
}

fn heading_level(tag: &str) -> Option<usize> {
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some((d - b'0') as usize),
        _ => None,
    }
}

fn has_block_ancestor(el: &ElementRef) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| BLOCK_TAGS.contains(&a.value().name()))
}

fn body_text(doc: &Html) -> String {
    let Ok(sel) = Selector::parse("body") else { return String::new() };
    doc.select(&sel)
        .next()
        .map(|body| {
            body.text()
                .map(normalize)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Collapse runs of whitespace to a single space.
fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
