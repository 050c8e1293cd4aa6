//! # casebrief
//!
//! Summarise legal case files into structured reports with a locally-hosted
//! LLM.
//!
//! ## Why this crate?
//!
//! Case files arrive as a mixed bag of PDFs, Word documents, and plain text.
//! Reading them into one analysable corpus, keeping a single corrupt file
//! from sinking the batch, and turning the model's answer back into a
//! paginated PDF is where the actual engineering lives — the model call
//! itself is one HTTP round-trip. This crate implements that pipeline and
//! leaves the inference to a local Ollama instance, so nothing ever leaves
//! the machine.
//!
//! ## Pipeline Overview
//!
//! ```text
//! uploads (pdf/docx/txt)
//!  │
//!  ├─ 1. Extract   per-format text extraction; failures degrade inline
//!  ├─ 2. Prompt    join corpus, cut to budget, prepend the 9-section template
//!  ├─ 3. Complete  one non-streaming call to Ollama (sentinel on failure)
//!  ├─ 4. Layout    pure word-wrap + pagination against Helvetica metrics
//!  └─ 5. Persist   {base}.txt and {base}.pdf into the artifact store
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use casebrief::{analyze, AnalysisConfig, MemoryStore, OllamaClient, UploadedDocument};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::default();
//!     let client = OllamaClient::from_config(&config);
//!     let store = MemoryStore::new();
//!
//!     let docs = vec![UploadedDocument::new(
//!         "complaint.txt",
//!         std::fs::read("complaint.txt")?,
//!     )];
//!     let output = analyze(docs, &config, &client, &store).await?;
//!     println!("report: {}", output.base_name);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | Enables the `casebrief` HTTP server binary (axum + clap + tracing-subscriber) |
//!
//! Disable `server` when using only the library:
//! ```toml
//! casebrief = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompt;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::analyze;
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use document::{DocumentKind, ExtractedBlock, ExtractionStatus, UploadedDocument};
pub use error::CasebriefError;
pub use output::AnalysisOutput;
pub use pipeline::completion::{CompletionClient, CompletionResult, OllamaClient, ScriptedClient};
pub use pipeline::layout::{PageMetrics, PositionedLine};
pub use storage::{ArtifactStore, DirStore, MemoryStore};
