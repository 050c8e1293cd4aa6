//! Analysis orchestrator: the linear pipeline from uploaded files to a
//! persisted report.
//!
//! The state machine is deliberately straight-line — extract, prompt,
//! complete, render, persist — with no branching retries. Any stage can
//! fail the request with a specific [`CasebriefError`]; nothing is written
//! to the store until both artifact bodies have been rendered, so the two
//! files of a report either both appear or neither does.

use crate::config::AnalysisConfig;
use crate::document::UploadedDocument;
use crate::error::CasebriefError;
use crate::output::AnalysisOutput;
use crate::pipeline::completion::{CompletionClient, CompletionResult};
use crate::pipeline::{extract, render};
use crate::prompt;
use crate::storage::ArtifactStore;
use std::time::Instant;
use tracing::{debug, info};

/// Run the full analysis pipeline for one batch of uploaded documents.
///
/// # Arguments
/// * `documents` — the batch, in upload order
/// * `config`    — pipeline configuration
/// * `client`    — completion backend (a live [`crate::pipeline::completion::OllamaClient`]
///   or a scripted fake)
/// * `store`     — artifact store the report files are written to
///
/// # Errors
/// * [`CasebriefError::NoFiles`] — empty batch, rejected before any work
/// * [`CasebriefError::ServiceUnavailable`] — completion sentinel came back
/// * [`CasebriefError::EmptyCompletion`] — answer below the plausibility
///   threshold
/// * persistence and rendering errors propagate as returned by their stage
pub async fn analyze(
    documents: Vec<UploadedDocument>,
    config: &AnalysisConfig,
    client: &dyn CompletionClient,
    store: &dyn ArtifactStore,
) -> Result<AnalysisOutput, CasebriefError> {
    let start = Instant::now();

    // ── Step 1: Validate the batch ───────────────────────────────────────
    if documents.is_empty() {
        return Err(CasebriefError::NoFiles);
    }
    let files_received: Vec<String> = documents.iter().map(|d| d.filename.clone()).collect();
    info!("analysing batch of {} file(s)", documents.len());

    // ── Step 2: Extract text from every document ─────────────────────────
    // PDF and DOCX parsing is CPU-bound; keep it off the async workers.
    let blocks = tokio::task::spawn_blocking(move || extract::extract_all(&documents))
        .await
        .map_err(|e| CasebriefError::Internal(format!("extraction task panicked: {e}")))?;

    // ── Step 3: Assemble the prompt ──────────────────────────────────────
    let corpus = prompt::join_corpus(&blocks);
    let full_prompt = prompt::build_prompt(&corpus, config.max_corpus_chars);
    debug!(
        "prompt assembled: {} chars corpus, {} chars total",
        corpus.len(),
        full_prompt.len()
    );

    // ── Step 4: One completion round-trip ────────────────────────────────
    let report = match gate_plausibility(
        client.complete(&full_prompt).await,
        config.min_completion_chars,
    ) {
        CompletionResult::Success { text } => text,
        CompletionResult::Unreachable { detail } => {
            return Err(CasebriefError::ServiceUnavailable { detail });
        }
        CompletionResult::Empty { len } => {
            return Err(CasebriefError::EmptyCompletion {
                len,
                min: config.min_completion_chars,
            });
        }
    };

    // ── Step 5: Derive the report identifier ─────────────────────────────
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base_name = format!("{}_{}", config.report_prefix, timestamp);
    let txt_file = format!("{base_name}.txt");
    let pdf_file = format!("{base_name}.pdf");

    // ── Step 6: Render both artifact bodies before persisting either ─────
    let txt_bytes = render::render_text(&report);
    let page = config.page.clone();
    let report_for_pdf = report.clone();
    let pdf_bytes =
        tokio::task::spawn_blocking(move || render::render_pdf(&report_for_pdf, &page))
            .await
            .map_err(|e| CasebriefError::Internal(format!("render task panicked: {e}")))??;

    // ── Step 7: Persist ──────────────────────────────────────────────────
    store.write(&txt_file, &txt_bytes).await?;
    store.write(&pdf_file, &pdf_bytes).await?;

    info!(
        "report {} written ({} chars, {} PDF bytes) in {:?}",
        base_name,
        report.len(),
        pdf_bytes.len(),
        start.elapsed()
    );

    Ok(AnalysisOutput {
        base_name,
        txt_file,
        pdf_file,
        files_received,
    })
}

/// Downgrade a successful completion that is too short to be a report.
///
/// The threshold guards against models that answer with "ok" or a bare
/// apology: shorter than `min_chars` cannot even contain the section
/// headings, so it is treated as a service failure, not persisted.
fn gate_plausibility(result: CompletionResult, min_chars: usize) -> CompletionResult {
    match result {
        CompletionResult::Success { text } => {
            let len = text.chars().count();
            if len < min_chars {
                CompletionResult::Empty { len }
            } else {
                CompletionResult::Success { text }
            }
        }
        other => other,
    }
}
