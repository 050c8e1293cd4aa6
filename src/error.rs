//! Error types for the casebrief library.
//!
//! Only *pipeline-fatal* conditions are represented as errors:
//!
//! * [`CasebriefError`] — the analysis cannot produce a report at all
//!   (empty upload batch, completion service down, implausibly short
//!   answer, artifact persistence failure). Returned as
//!   `Err(CasebriefError)` from [`crate::analyze::analyze`].
//!
//! Per-document extraction failures are deliberately NOT errors. A corrupt
//! PDF in a five-file batch must not abort the other four, so extraction
//! degrades to an inline diagnostic string inside the corpus (see
//! [`crate::pipeline::extract`]) and the pipeline always has *some* text to
//! send. The caller can still see what happened: the diagnostic names the
//! file and carries the underlying parser message.

use thiserror::Error;

/// All fatal errors returned by the casebrief library.
///
/// The first three variants map onto the caller-facing failure taxonomy:
/// `NoFiles` is a client input error; `ServiceUnavailable` and
/// `EmptyCompletion` are upstream service failures. HTTP layers should keep
/// that distinction (400 vs 500).
#[derive(Debug, Error)]
pub enum CasebriefError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The upload batch contained no documents.
    #[error("no files were uploaded")]
    NoFiles,

    // ── Completion service errors ─────────────────────────────────────────
    /// The local LLM service could not be reached or returned an error.
    #[error("LLM service unavailable: {detail}\nEnsure Ollama is running and the model is pulled.")]
    ServiceUnavailable { detail: String },

    /// The model answered, but with too little text to be a plausible report.
    #[error("LLM returned an empty response ({len} chars, minimum {min})")]
    EmptyCompletion { len: usize, min: usize },

    // ── Rendering errors ──────────────────────────────────────────────────
    /// The PDF writer failed to serialise the report.
    #[error("failed to render PDF report: {detail}")]
    PdfRenderFailed { detail: String },

    // ── Storage errors ────────────────────────────────────────────────────
    /// Writing an artifact to the store failed.
    #[error("failed to write artifact '{name}': {detail}")]
    ArtifactWriteFailed { name: String, detail: String },

    /// The requested artifact name does not exist in the store.
    ///
    /// Also returned for names that try to escape the store directory;
    /// a traversal attempt is indistinguishable from a miss on purpose.
    #[error("artifact not found: '{name}'")]
    ArtifactNotFound { name: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CasebriefError {
    /// True for errors caused by the request itself rather than by this
    /// service or its collaborators. HTTP layers map these to 400.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CasebriefError::NoFiles | CasebriefError::ArtifactNotFound { .. }
        )
    }
}
