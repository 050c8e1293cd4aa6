//! Uploaded-document model: classification by extension and the extracted
//! text block that each document contributes to the corpus.
//!
//! Documents are ephemeral — they exist only for the duration of one
//! analysis request and are owned by the orchestrator. Nothing here is
//! persisted; only the final report artifacts outlive the request.

use serde::Serialize;

/// One uploaded case file: the name the client sent and its raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// Client-supplied filename, used for extension classification and for
    /// the BEGIN/END markers in the extracted corpus.
    pub filename: String,
    /// Raw file content as received.
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Classify this document by its filename extension.
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_filename(&self.filename)
    }
}

/// Supported document formats, classified from the filename extension
/// (case-insensitive). Anything else is `Unsupported` and is skipped with
/// an inline notice rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Unsupported,
}

impl DocumentKind {
    /// Classify a filename by its extension, case-insensitively.
    ///
    /// A file with no extension at all (`README`, `archive.`) is
    /// `Unsupported`.
    pub fn from_filename(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "txt" => DocumentKind::Txt,
            _ => DocumentKind::Unsupported,
        }
    }

    /// Marker label used in the BEGIN/END delimiters of extracted text.
    pub fn marker_label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
            DocumentKind::Txt => "TXT",
            DocumentKind::Unsupported => "UNSUPPORTED",
        }
    }
}

/// How extraction of a single document went.
///
/// None of these abort the batch: `Partial` and `Failed` only change what
/// text the document contributes (empty pages, or an inline diagnostic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Every part of the document yielded text.
    Ok,
    /// The document decoded, but some pages contributed no text.
    Partial,
    /// The document could not be decoded; its block is a diagnostic string.
    Failed,
    /// Unsupported extension; the block is a skip notice.
    Skipped,
}

/// The demarcated text one document contributes to the corpus.
///
/// Immutable once built. Blocks are concatenated in upload order; the
/// markers inside `text` name the source file so the model can attribute
/// statements to documents.
#[derive(Debug, Clone)]
pub struct ExtractedBlock {
    /// Filename of the originating document.
    pub source: String,
    pub status: ExtractionStatus,
    /// Marker-delimited text (or an inline diagnostic for `Failed`/`Skipped`).
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(DocumentKind::from_filename("brief.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("claim.Docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("notes.TXT"), DocumentKind::Txt);
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        assert_eq!(
            DocumentKind::from_filename("scan.jpeg"),
            DocumentKind::Unsupported
        );
        assert_eq!(
            DocumentKind::from_filename("archive.tar.gz"),
            DocumentKind::Unsupported
        );
        assert_eq!(
            DocumentKind::from_filename("README"),
            DocumentKind::Unsupported
        );
        assert_eq!(DocumentKind::from_filename(""), DocumentKind::Unsupported);
    }

    #[test]
    fn dotted_names_use_last_extension() {
        assert_eq!(
            DocumentKind::from_filename("case.v2.final.pdf"),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn kind_reads_through_document() {
        let doc = UploadedDocument::new("exhibit_a.docx", vec![]);
        assert_eq!(doc.kind(), DocumentKind::Docx);
    }
}
