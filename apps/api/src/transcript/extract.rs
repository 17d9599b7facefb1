//! Document text extraction. Converts raw PDF bytes into per-page text blocks.
//!
//! `lopdf` is the primary extractor because it preserves page boundaries.
//! When it yields no text at all, `pdf-extract` is tried as a fallback on the
//! same bytes (its form-feed page breaks are used when they line up).

use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;

/// Text of a document, one block per page, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub pages: Vec<String>,
    pub page_count: usize,
}

impl ExtractedDocument {
    /// Canonical full text: page blocks joined by newlines, outer whitespace trimmed.
    pub fn full_text(&self) -> String {
        self.pages.join("\n").trim().to_string()
    }
}

/// Extracts per-page text from a PDF held in memory.
///
/// Fails with `UnreadableDocument` for empty input, bytes that are not a
/// PDF, or a PDF with zero pages.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedDocument, AppError> {
    if bytes.is_empty() {
        return Err(AppError::UnreadableDocument(
            "document is empty".to_string(),
        ));
    }

    let document = Document::load_mem(bytes)
        .map_err(|e| AppError::UnreadableDocument(format!("not a readable PDF: {e}")))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(AppError::UnreadableDocument(
            "document has no pages".to_string(),
        ));
    }
    let page_count = page_numbers.len();

    let mut pages: Vec<String> = page_numbers
        .iter()
        .map(|&page_number| match document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract text from page {page_number}: {e}");
                String::new()
            }
        })
        .collect();

    if pages.iter().all(|p| p.trim().is_empty()) {
        if let Some(fallback) = fallback_pages(bytes, page_count) {
            pages = fallback;
        }
    }

    let chars: usize = pages.iter().map(|p| p.len()).sum();
    info!("Extracted {chars} chars from {page_count} page(s)");

    Ok(ExtractedDocument { pages, page_count })
}

/// Runs `pdf-extract` over the whole document. Returns `None` when it fails,
/// panics, or finds nothing.
fn fallback_pages(bytes: &[u8], page_count: usize) -> Option<Vec<String>> {
    let result = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));
    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            debug!("pdf-extract fallback failed: {e}");
            return None;
        }
        Err(_) => {
            warn!("pdf-extract fallback panicked");
            return None;
        }
    };

    if text.trim().is_empty() {
        return None;
    }
    Some(paginate(text, page_count))
}

/// Splits pdf-extract output on form feeds. When the breaks do not line up
/// with `page_count`, all text goes on the first page.
fn paginate(text: String, page_count: usize) -> Vec<String> {
    let split: Vec<String> = text
        .trim_end_matches('\x0C')
        .split('\x0C')
        .map(str::to_string)
        .collect();
    if split.len() == page_count {
        return split;
    }

    debug!(
        "pdf-extract produced {} page break(s) for {page_count} page(s)",
        split.len().saturating_sub(1)
    );
    let mut pages = vec![String::new(); page_count.max(1)];
    pages[0] = text;
    pages
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Builds a PDF where each inner slice is a page and each string a text line.
    pub(crate) fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            let mut operations = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                let y = 750 - (i as i64) * 14;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
                operations.push(Operation::new("Td", vec![50.into(), y.into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(*line)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_empty_bytes_are_unreadable() {
        let err = extract_text(&[]).unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_corrupted_header_is_unreadable() {
        let err = extract_text(b"this is definitely not a pdf").unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_zero_page_document_is_unreadable() {
        let bytes = build_pdf(&[]);
        let err = extract_text(&bytes).unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[test]
    fn test_extracts_one_block_per_page() {
        let bytes = build_pdf(&[&["Unofficial Transcript"], &["CSE 143 Programming II A 5.0"]]);
        let doc = extract_text(&bytes).unwrap();

        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.pages[0].contains("Unofficial Transcript"));
        assert!(doc.pages[1].contains("CSE 143"));
    }

    #[test]
    fn test_paginate_splits_on_form_feeds() {
        let pages = paginate("page one\x0Cpage two\x0C".to_string(), 2);
        assert_eq!(pages, vec!["page one", "page two"]);
    }

    #[test]
    fn test_paginate_keeps_page_count_when_breaks_mismatch() {
        let pages = paginate("CSE 142 Computer Programming I A 4.0".to_string(), 3);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], "CSE 142 Computer Programming I A 4.0");
        assert!(pages[1].is_empty() && pages[2].is_empty());
    }

    #[test]
    fn test_full_text_joins_pages_and_trims() {
        let doc = ExtractedDocument {
            pages: vec!["  first page".to_string(), "second page \n".to_string()],
            page_count: 2,
        };
        assert_eq!(doc.full_text(), "first page\nsecond page");
    }
}
