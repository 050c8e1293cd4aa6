//! Multi-format text extraction with a never-fails contract.
//!
//! [`extract`] is a total function: whatever the bytes contain, it returns a
//! block of text. Failures degrade to inline diagnostics at the point of
//! failure instead of propagating, so one corrupt document can never abort a
//! batch — the model simply sees `[Error reading …]` where that document's
//! text would have been.
//!
//! ## Why `catch_unwind` around the PDF parser?
//!
//! `pdf_extract` panics on some malformed inputs rather than returning an
//! error. An unwinding panic inside a request handler would poison the whole
//! request, so the call is fenced with [`std::panic::catch_unwind`] and a
//! panic is reported exactly like a parse error.

use crate::document::{DocumentKind, ExtractedBlock, ExtractionStatus, UploadedDocument};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Extract the demarcated text block for one uploaded document.
///
/// Never fails. The returned block's `text` is either marker-wrapped content
/// or an inline diagnostic (`Failed`/`Skipped` status).
pub fn extract(doc: &UploadedDocument) -> ExtractedBlock {
    let block = match doc.kind() {
        DocumentKind::Pdf => extract_pdf(&doc.filename, &doc.bytes),
        DocumentKind::Docx => extract_docx(&doc.filename, &doc.bytes),
        DocumentKind::Txt => extract_txt(&doc.filename, &doc.bytes),
        DocumentKind::Unsupported => skipped(&doc.filename),
    };
    debug!(
        "extracted '{}': status {:?}, {} chars",
        block.source,
        block.status,
        block.text.len()
    );
    block
}

/// Extract every document of a batch, in upload order.
pub fn extract_all(documents: &[UploadedDocument]) -> Vec<ExtractedBlock> {
    documents.iter().map(extract).collect()
}

/// `--- BEGIN PDF: name ---\n…\n--- END PDF: name ---`
fn wrap_markers(label: &str, name: &str, body: &str) -> String {
    format!("--- BEGIN {label}: {name} ---\n{body}\n--- END {label}: {name} ---")
}

fn skipped(name: &str) -> ExtractedBlock {
    ExtractedBlock {
        source: name.to_string(),
        status: ExtractionStatus::Skipped,
        text: format!("[Skipped unsupported file: {name}]"),
    }
}

fn failed(name: &str, detail: &str) -> ExtractedBlock {
    warn!("failed to extract '{}': {}", name, detail);
    ExtractedBlock {
        source: name.to_string(),
        status: ExtractionStatus::Failed,
        text: format!("[Error reading {name}: {detail}]"),
    }
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Decode a PDF and join its per-page text with newlines.
///
/// Pages the parser cannot read come back as empty strings; their slots are
/// kept so page order survives, and the block is marked `Partial`. Only a
/// whole-document parse failure (or parser panic) produces a diagnostic.
fn extract_pdf(name: &str, bytes: &[u8]) -> ExtractedBlock {
    let owned = bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&owned)
    }));

    let pages = match result {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => return failed(name, &e.to_string()),
        Err(_) => return failed(name, "PDF parser panicked (malformed document)"),
    };

    let status = if pages.iter().any(|p| p.trim().is_empty()) {
        ExtractionStatus::Partial
    } else {
        ExtractionStatus::Ok
    };

    ExtractedBlock {
        source: name.to_string(),
        status,
        text: wrap_markers("PDF", name, &pages.join("\n")),
    }
}

// ── DOCX ─────────────────────────────────────────────────────────────────

/// Decode a DOCX archive and join its paragraph texts with newlines.
///
/// A .docx file is a ZIP archive whose main body lives in
/// `word/document.xml`; paragraph text is the concatenation of the `w:t`
/// runs inside each `w:p` element. Formatting, tables, and headers are not
/// interpreted — the report prompt only needs the prose.
fn extract_docx(name: &str, bytes: &[u8]) -> ExtractedBlock {
    match docx_paragraphs(bytes) {
        Ok(paragraphs) => ExtractedBlock {
            source: name.to_string(),
            status: ExtractionStatus::Ok,
            text: wrap_markers("DOCX", name, &paragraphs.join("\n")),
        },
        Err(detail) => failed(name, &detail),
    }
}

fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>, String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| format!("not a DOCX archive: {e}"))?;

    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {e}"))?;

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| format!("unreadable document body: {e}"))?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:p" => {
                in_paragraph = true;
                current.clear();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => {
                in_paragraph = false;
                paragraphs.push(std::mem::take(&mut current));
            }
            // Self-closing <w:p/> is still a (blank) paragraph.
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(String::new());
            }
            Ok(Event::Text(e)) if in_paragraph => {
                current.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed document XML: {e}")),
        }
        buf.clear();
    }

    Ok(paragraphs)
}

// ── TXT ──────────────────────────────────────────────────────────────────

/// Decode plain text as UTF-8, replacing undecodable byte sequences.
///
/// Lossy decoding cannot fail, so unlike the other formats this path has no
/// diagnostic branch.
fn extract_txt(name: &str, bytes: &[u8]) -> ExtractedBlock {
    let body = String::from_utf8_lossy(bytes);
    ExtractedBlock {
        source: name.to_string(),
        status: ExtractionStatus::Ok,
        text: wrap_markers("TXT", name, &body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn doc(name: &str, bytes: &[u8]) -> UploadedDocument {
        UploadedDocument::new(name, bytes.to_vec())
    }

    /// Build a minimal in-memory .docx with the given paragraphs.
    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut zip = zip::ZipWriter::new(&mut cursor);
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn txt_block_has_exact_marker_shape() {
        let block = extract(&doc("file.txt", b"Hello"));
        assert_eq!(block.status, ExtractionStatus::Ok);
        assert_eq!(
            block.text,
            "--- BEGIN TXT: file.txt ---\nHello\n--- END TXT: file.txt ---"
        );
    }

    #[test]
    fn txt_replaces_invalid_utf8_instead_of_failing() {
        let block = extract(&doc("latin1.txt", &[b'c', b'a', b'f', 0xE9]));
        assert_eq!(block.status, ExtractionStatus::Ok);
        assert!(block.text.contains('\u{FFFD}'));
        assert!(block.text.contains("BEGIN TXT: latin1.txt"));
    }

    #[test]
    fn unsupported_extension_yields_skip_notice() {
        let block = extract(&doc("photo.jpeg", b"\xff\xd8\xff"));
        assert_eq!(block.status, ExtractionStatus::Skipped);
        assert_eq!(block.text, "[Skipped unsupported file: photo.jpeg]");
    }

    #[test]
    fn corrupt_pdf_degrades_to_inline_diagnostic() {
        let block = extract(&doc("broken.pdf", b"%PDF-1.4 garbage"));
        assert_eq!(block.status, ExtractionStatus::Failed);
        assert!(block.text.starts_with("[Error reading broken.pdf:"));
    }

    #[test]
    fn docx_paragraphs_join_with_newlines() {
        let bytes = docx_bytes(&["First paragraph.", "Second paragraph."]);
        let block = extract(&doc("claim.docx", &bytes));
        assert_eq!(block.status, ExtractionStatus::Ok);
        assert_eq!(
            block.text,
            "--- BEGIN DOCX: claim.docx ---\nFirst paragraph.\nSecond paragraph.\n--- END DOCX: claim.docx ---"
        );
    }

    #[test]
    fn docx_unescapes_xml_entities() {
        let bytes = docx_bytes(&["Smith &amp; Jones"]);
        let block = extract(&doc("parties.docx", &bytes));
        assert!(block.text.contains("Smith & Jones"));
    }

    #[test]
    fn corrupt_docx_degrades_to_inline_diagnostic() {
        let block = extract(&doc("broken.docx", b"PK\x03\x04 not a real zip"));
        assert_eq!(block.status, ExtractionStatus::Failed);
        assert!(block.text.starts_with("[Error reading broken.docx:"));
    }

    #[test]
    fn batch_extraction_preserves_upload_order() {
        let docs = vec![
            doc("a.txt", b"alpha"),
            doc("b.txt", b"beta"),
            doc("c.txt", b"gamma"),
        ];
        let blocks = extract_all(&docs);
        assert_eq!(blocks.len(), 3);
        for (block, name) in blocks.iter().zip(["a.txt", "b.txt", "c.txt"]) {
            assert_eq!(block.source, name);
            assert!(block.text.contains(&format!("BEGIN TXT: {name}")));
            assert!(block.text.contains(&format!("END TXT: {name}")));
        }
    }
}
