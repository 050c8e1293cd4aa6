//! The report prompt: a frozen instruction template plus corpus assembly.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the nine numbered sections are a contract
//!    that the renderer and every downstream consumer of a report relies on;
//!    changing a heading means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    a live model, making budget and ordering regressions easy to catch.
//!
//! No stage of this pipeline validates that the model actually followed the
//! template. Report bodies are advisory, unstructured text to downstream
//! code; the template is the only place the structure is stated.

use crate::document::ExtractedBlock;
use tracing::warn;

/// System instruction sent with every completion request.
///
/// Used when [`crate::config::AnalysisConfig::system_prompt`] is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a precise legal analyst. Output exactly the requested structure.";

/// Instruction template prepended to the document corpus.
///
/// Defines the mandatory nine-section report layout and the triage rule for
/// non-legal material. The heading text is frozen: the model is told to copy
/// it verbatim, so edits here silently change the shape of every report.
pub const REPORT_PROMPT: &str = r#"You are a legal analysis AI. You MUST follow the EXACT format below. DO NOT deviate from this structure.

STEP 1: Determine if the documents contain legal case materials (court cases, lawsuits, legal disputes, judgments, pleadings, legal briefs, court orders, legal contracts disputes, etc.)

STEP 2: If documents are NOT legal case materials (receipts, invoices, tickets, personal documents, etc.), write "Not legal case materials" in section 1 and "N/A" for ALL other sections.

STEP 3: If documents ARE legal case materials, analyze them and fill each section.

MANDATORY OUTPUT FORMAT - Copy these headings EXACTLY:

1. 25 Word Summary of the Case including Category of Law
[If not legal case materials, write: "Not legal case materials"]
[If legal case materials, write EXACTLY 25 words summarizing the case and legal category]

2. Name of Plaintiff & Defendant including respective Attorneys representing them
Plaintiff: [Name or N/A] | Attorney: [Name or N/A]
Defendant: [Name or N/A] | Attorney: [Name or N/A]

3. Case Story (Within 500 Words)
[Narrative description of the legal dispute or "N/A"]

4. Key Facts of the Case
• [Fact 1 or N/A]
• [Fact 2 or N/A]
• [Additional facts as bullet points or just • N/A]

5. Claims Made by Plaintiff including evidences/Documents
• [Claim 1 with evidence or N/A]
• [Claim 2 with evidence or N/A]
• [Additional claims as bullet points or just • N/A]

6. Claims Made by Defendant including evidences/Documents
• [Claim 1 with evidence or N/A]
• [Claim 2 with evidence or N/A]
• [Additional claims as bullet points or just • N/A]

7. List of Act, Section, Law and why it is applicable
• [Act/Section - Reason or N/A]
• [Additional acts as bullet points or just • N/A]

8. Procedural History (If Any)
[Chronological procedural events or "N/A"]

9. Comprehensive List of Dates/Chronology of Events
• [DD MMM YYYY - Event description or N/A]
• [Additional dates as bullet points or just • N/A]

CRITICAL RULES:
- Use ONLY the 9 numbered sections above
- Keep the exact heading text
- If not legal case materials, section 1 = "Not legal case materials", all others = "N/A"
- Do NOT add introduction paragraphs
- Do NOT add conclusion paragraphs
- Do NOT add additional sections
- Do NOT change the numbering
- Start immediately with "1. 25 Word Summary..."
- End immediately after section 9
- Use bullet points (•) where specified
- Write "N/A" when information is missing

Documents to analyze:
"#;

/// Join extracted blocks into the document corpus, in upload order,
/// separated by blank lines.
pub fn join_corpus(blocks: &[ExtractedBlock]) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Assemble the complete prompt: template + newline + budget-trimmed corpus.
///
/// The corpus is cut to at most `max_chars` characters. The cut is a plain
/// prefix — trailing content of large batches is dropped, never summarised —
/// and lands on a `char` boundary so multi-byte text cannot be split
/// mid-codepoint. When anything is dropped, the loss is logged so oversized
/// batches are at least visible in the traces.
pub fn build_prompt(corpus: &str, max_chars: usize) -> String {
    let trimmed = match corpus.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            warn!(
                "corpus exceeds {} chars; dropping {} trailing chars",
                max_chars,
                corpus.chars().count() - max_chars
            );
            &corpus[..byte_idx]
        }
        None => corpus,
    };
    format!("{}\n{}", REPORT_PROMPT, trimmed)
}
