//! Pure text layout: greedy word wrap and pagination.
//!
//! [`layout_text`] is a pure function of (text, page metrics) → positioned
//! lines, so every wrapping and pagination rule is unit-testable without a
//! rendering backend. The PDF writer in [`crate::pipeline::render`] consumes
//! the positioned lines verbatim and adds nothing of its own.
//!
//! This is a minimal, deterministic engine: no widow/orphan control, no
//! font-size scaling, no justification. Report bodies are plain structured
//! text, and a predictable layout matters more than typographic polish.
//!
//! ## Width measurement
//!
//! Line width is computed from the Helvetica AFM advance widths (exact for
//! the printable ASCII range, plus the typographic characters the report
//! prompt can produce). Builtin PDF fonts carry no embedded metrics, so the
//! table here is what makes "does this line fit" answerable at layout time.

/// Millimetres per PostScript point (1 pt = 1/72 inch).
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Convert points to millimetres (the unit PDF page setups are quoted in).
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Page geometry and font metrics for the PDF report.
///
/// Lengths that describe the physical page are in millimetres (what PDF
/// page setups are quoted in); everything font-related is in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetrics {
    /// Page width in millimetres. Default: 210 (A4).
    pub width_mm: f32,
    /// Page height in millimetres. Default: 297 (A4).
    pub height_mm: f32,
    /// Margin applied on all four sides, in millimetres. Default: 20.
    pub margin_mm: f32,
    /// Font size in points. Default: 10.
    pub font_size: f32,
    /// Vertical advance per line, in points. Default: 14.
    pub line_height: f32,
    /// Extra vertical space after each paragraph, in points. Default: 6.
    pub paragraph_gap: f32,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 20.0,
            font_size: 10.0,
            line_height: 14.0,
            paragraph_gap: 6.0,
        }
    }
}

impl PageMetrics {
    pub fn width_pt(&self) -> f32 {
        self.width_mm / MM_PER_PT
    }

    pub fn height_pt(&self) -> f32 {
        self.height_mm / MM_PER_PT
    }

    pub fn margin_pt(&self) -> f32 {
        self.margin_mm / MM_PER_PT
    }

    /// Horizontal space available to a line of text.
    pub fn usable_width_pt(&self) -> f32 {
        self.width_pt() - 2.0 * self.margin_pt()
    }

    /// Baseline of the first line on a fresh page.
    pub fn top_y_pt(&self) -> f32 {
        self.height_pt() - self.margin_pt()
    }

    /// Check that the geometry can hold at least one line of text.
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size <= 0.0 || self.line_height <= 0.0 {
            return Err("font size and line height must be positive".into());
        }
        if self.paragraph_gap < 0.0 {
            return Err("paragraph gap must not be negative".into());
        }
        if self.usable_width_pt() <= self.font_size {
            return Err(format!(
                "margins of {} mm leave no usable width on a {} mm page",
                self.margin_mm, self.width_mm
            ));
        }
        if self.top_y_pt() <= self.margin_pt() {
            return Err(format!(
                "margins of {} mm leave no usable height on a {} mm page",
                self.margin_mm, self.height_mm
            ));
        }
        Ok(())
    }
}

/// One laid-out line: which page it belongs to and where its baseline sits.
///
/// `y_pt` is measured from the bottom of the page, matching PDF coordinate
/// space, and is always ≥ the bottom margin.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    /// 0-based page index.
    pub page: usize,
    /// Baseline height above the page bottom, in points.
    pub y_pt: f32,
    pub text: String,
}

/// Number of pages a laid-out document occupies (always ≥ 1: the empty
/// document still renders one blank page).
pub fn page_count(lines: &[PositionedLine]) -> usize {
    lines.iter().map(|l| l.page).max().map_or(1, |max| max + 1)
}

/// Lay out a report body onto fixed-size pages.
///
/// * Input splits on `\n` into paragraphs; a blank line contributes no text
///   but its paragraph gap survives as vertical spacing.
/// * Words are wrapped greedily against the usable page width.
/// * A line whose baseline would sit below the bottom margin opens a new
///   page instead — content is never clipped or drawn into the margin.
pub fn layout_text(text: &str, metrics: &PageMetrics) -> Vec<PositionedLine> {
    let usable_width = metrics.usable_width_pt();
    let margin = metrics.margin_pt();
    let top = metrics.top_y_pt();

    let mut lines: Vec<PositionedLine> = Vec::new();
    let mut page = 0usize;
    let mut y = top;

    for paragraph in text.split('\n') {
        for line in wrap_paragraph(paragraph, metrics.font_size, usable_width) {
            if y < margin {
                page += 1;
                y = top;
            }
            lines.push(PositionedLine {
                page,
                y_pt: y,
                text: line,
            });
            y -= metrics.line_height;
        }
        y -= metrics.paragraph_gap;
    }

    lines
}

/// Greedily wrap one paragraph into lines no wider than `max_width_pt`.
///
/// A word that would overflow the current line starts a new one. A single
/// word wider than the whole line is split at character level (no hyphen),
/// so no emitted line ever measures wider than `max_width_pt`.
/// The empty paragraph wraps to no lines at all.
pub fn wrap_paragraph(paragraph: &str, font_size: f32, max_width_pt: f32) -> Vec<String> {
    let mut wrapped: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in paragraph.split_whitespace() {
        for piece in split_oversized(word, font_size, max_width_pt) {
            let candidate_width = if line.is_empty() {
                text_width_pt(&piece, font_size)
            } else {
                text_width_pt(&line, font_size)
                    + text_width_pt(" ", font_size)
                    + text_width_pt(&piece, font_size)
            };

            if candidate_width <= max_width_pt || line.is_empty() {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(&piece);
            } else {
                wrapped.push(std::mem::take(&mut line));
                line.push_str(&piece);
            }
        }
    }

    if !line.is_empty() {
        wrapped.push(line);
    }
    wrapped
}

/// Split a word into chunks that each fit the line width on their own.
///
/// Words that already fit come back whole; the pathological case (a single
/// run of characters wider than the page) is chopped greedily.
fn split_oversized(word: &str, font_size: f32, max_width_pt: f32) -> Vec<String> {
    if text_width_pt(word, font_size) <= max_width_pt {
        return vec![word.to_string()];
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        let char_width = glyph_advance(c) as f32 * font_size / 1000.0;
        if !piece.is_empty() && text_width_pt(&piece, font_size) + char_width > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
        }
        piece.push(c);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Rendered width of `text` at `font_size`, in points.
pub fn text_width_pt(text: &str, font_size: f32) -> f32 {
    let milli: u32 = text.chars().map(|c| glyph_advance(c) as u32).sum();
    milli as f32 * font_size / 1000.0
}

/// Helvetica advance widths for the printable ASCII range (0x20–0x7E),
/// in 1/1000 em, from the Adobe AFM for the base-14 Helvetica.
#[rustfmt::skip]
const ASCII_ADVANCES: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0 1 2 3 4 5 6 7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A B C D E F G
    722, 278, 500, 667, 556, 833, 722, 778, // H I J K L M N O
    667, 778, 722, 667, 611, 722, 667, 944, // P Q R S T U V W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a b c d e f g
    556, 222, 222, 500, 222, 833, 556, 556, // h i j k l m n o
    556, 556, 333, 500, 278, 556, 500, 722, // p q r s t u v w
    500, 500, 500, 334, 260, 334, 584,      // x y z { | } ~
];

/// Advance width of one character in 1/1000 em.
///
/// ASCII is exact; the typographic punctuation the report prompt emits is
/// listed explicitly; anything else falls back to the average lowercase
/// width, which keeps measurements close for Latin-script text.
fn glyph_advance(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_ADVANCES[(c as usize) - 0x20],
        '\u{2022}' => 350,            // bullet
        '\u{2013}' => 556,            // en dash
        '\u{2014}' => 1000,           // em dash
        '\u{2018}' | '\u{2019}' => 222, // curly single quotes
        '\u{201C}' | '\u{201D}' => 333, // curly double quotes
        '\u{2026}' => 1000,           // ellipsis
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> PageMetrics {
        PageMetrics::default()
    }

    #[test]
    fn default_metrics_validate() {
        assert!(metrics().validate().is_ok());
    }

    #[test]
    fn degenerate_margins_are_rejected() {
        let bad = PageMetrics {
            margin_mm: 110.0,
            ..PageMetrics::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn empty_input_is_one_blank_page() {
        let lines = layout_text("", &metrics());
        assert!(lines.is_empty());
        assert_eq!(page_count(&lines), 1);
    }

    #[test]
    fn no_line_exceeds_usable_width() {
        let m = metrics();
        let body = "The plaintiff alleges breach of contract and seeks damages. "
            .repeat(40);
        for line in layout_text(&body, &m) {
            assert!(
                text_width_pt(&line.text, m.font_size) <= m.usable_width_pt() + 0.01,
                "line too wide: {:?}",
                line.text
            );
        }
    }

    #[test]
    fn oversized_word_is_split_not_overflowed() {
        let m = metrics();
        let body = "x".repeat(600);
        let lines = layout_text(&body, &m);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_pt(&line.text, m.font_size) <= m.usable_width_pt() + 0.01);
        }
        // No character lost to the split.
        let total: usize = lines.iter().map(|l| l.text.len()).sum();
        assert_eq!(total, 600);
    }

    #[test]
    fn wrapping_preserves_word_order() {
        let m = metrics();
        let body = "one two three four five six seven eight nine ten ".repeat(30);
        let expected: Vec<&str> = body.split_whitespace().collect();
        let lines = layout_text(&body, &m);
        let actual: Vec<String> = lines
            .iter()
            .flat_map(|l| l.text.split_whitespace().map(str::to_string))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn no_baseline_sits_below_the_margin() {
        let m = metrics();
        let body = "line\n".repeat(400);
        let lines = layout_text(&body, &m);
        for line in &lines {
            assert!(
                line.y_pt >= m.margin_pt() - 0.01,
                "baseline {} below margin {} on page {}",
                line.y_pt,
                m.margin_pt(),
                line.page
            );
        }
        assert!(page_count(&lines) > 1, "400 lines must paginate");
    }

    #[test]
    fn each_new_page_restarts_at_the_top() {
        let m = metrics();
        let body = "line\n".repeat(400);
        let lines = layout_text(&body, &m);
        for page in 1..page_count(&lines) {
            let first = lines.iter().find(|l| l.page == page).unwrap();
            assert!((first.y_pt - m.top_y_pt()).abs() < 0.01);
        }
    }

    #[test]
    fn blank_lines_become_vertical_spacing() {
        let m = metrics();
        let lines = layout_text("alpha\n\nbeta", &m);
        assert_eq!(lines.len(), 2);
        let gap = lines[0].y_pt - lines[1].y_pt;
        // One line advance plus two paragraph gaps (alpha's and the blank's).
        let expected = m.line_height + 2.0 * m.paragraph_gap;
        assert!((gap - expected).abs() < 0.01, "gap was {gap}");
    }

    #[test]
    fn layout_is_deterministic() {
        let m = metrics();
        let body = "Justice delayed is justice denied. ".repeat(50);
        assert_eq!(layout_text(&body, &m), layout_text(&body, &m));
    }

    #[test]
    fn ascii_width_matches_afm_samples() {
        // Spot checks against the Adobe AFM values at 1000 units/em.
        assert_eq!(glyph_advance('i'), 222);
        assert_eq!(glyph_advance('W'), 944);
        assert_eq!(glyph_advance(' '), 278);
        assert_eq!(glyph_advance('@'), 1015);
        // "Wi" at 10pt: (944 + 222) / 1000 * 10
        assert!((text_width_pt("Wi", 10.0) - 11.66).abs() < 0.001);
    }
}
