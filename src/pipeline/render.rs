//! Report serialisation: the plain-text and PDF write paths.
//!
//! Both paths share one input string. The text path is a verbatim UTF-8
//! copy. The PDF path drives `printpdf` with the positions computed by
//! [`crate::pipeline::layout`] — all wrapping and pagination decisions are
//! made there, so this module stays a thin adapter between positioned lines
//! and the PDF content stream.
//!
//! ## Why spawn_blocking at the call site?
//!
//! Serialising a multi-page PDF is CPU-bound (deflate over every content
//! stream). The orchestrator runs [`render_pdf`] under
//! `tokio::task::spawn_blocking` so report generation cannot stall the
//! async workers serving other requests.

use crate::error::CasebriefError;
use crate::pipeline::layout::{self, PageMetrics, PositionedLine};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;
use tracing::debug;

/// Document title embedded in the PDF metadata.
const PDF_TITLE: &str = "Case Report";

/// Serialise the report verbatim as UTF-8 bytes.
pub fn render_text(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Lay out and serialise the report as a paginated PDF.
///
/// The empty report still produces a valid single-page document with no
/// drawn text.
pub fn render_pdf(text: &str, metrics: &PageMetrics) -> Result<Vec<u8>, CasebriefError> {
    let lines = layout::layout_text(text, metrics);
    let pages = layout::page_count(&lines);
    debug!("report layout: {} lines over {} pages", lines.len(), pages);

    let (doc, first_page, first_layer) = PdfDocument::new(
        PDF_TITLE,
        Mm(metrics.width_mm),
        Mm(metrics.height_mm),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| CasebriefError::PdfRenderFailed {
            detail: format!("font registration: {e}"),
        })?;

    // Page 0 exists from construction; create the rest up front so lines can
    // be drawn in layout order regardless of page boundaries.
    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..pages {
        let (page_idx, layer_idx) =
            doc.add_page(Mm(metrics.width_mm), Mm(metrics.height_mm), "Layer 1");
        layers.push(doc.get_page(page_idx).get_layer(layer_idx));
    }

    let x = Mm(metrics.margin_mm);
    for PositionedLine { page, y_pt, text } in &lines {
        layers[*page].use_text(
            text.as_str(),
            metrics.font_size,
            x,
            Mm(layout::pt_to_mm(*y_pt)),
            &font,
        );
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| CasebriefError::PdfRenderFailed {
            detail: format!("serialisation: {e}"),
        })?;
    buf.into_inner().map_err(|e| CasebriefError::PdfRenderFailed {
        detail: format!("buffer flush: {e}"),
    })
}
