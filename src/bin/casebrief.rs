//! HTTP server binary for casebrief.
//!
//! A thin shim over the library crate that maps CLI flags to
//! [`AnalysisConfig`], wires the live Ollama client and directory store,
//! and serves the axum router.

use anyhow::{Context, Result};
use casebrief::server::{router, AppState};
use casebrief::{AnalysisConfig, DirStore, OllamaClient};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Summarise legal case files into structured reports with a local LLM.
#[derive(Debug, Parser)]
#[command(name = "casebrief", version, about)]
struct Args {
    /// Address to bind the HTTP server on.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the HTTP server on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Base URL of the local Ollama instance.
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Model identifier used for every completion request.
    #[arg(long, env = "CASEBRIEF_MODEL", default_value = "llama3")]
    model: String,

    /// Directory the report artifacts are written to.
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,

    /// Maximum characters of extracted corpus sent to the model.
    #[arg(long, default_value_t = 120_000)]
    max_corpus_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casebrief=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = AnalysisConfig::builder()
        .ollama_base_url(&args.ollama_url)
        .model(&args.model)
        .max_corpus_chars(args.max_corpus_chars)
        .build()
        .context("invalid configuration")?;

    let client = OllamaClient::from_config(&config);
    let store = DirStore::open(&args.output_dir)
        .await
        .context("failed to open report directory")?;

    let state = AppState {
        config: Arc::new(config),
        client: Arc::new(client),
        store: Arc::new(store),
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("invalid host/port")?;
    info!(
        "casebrief listening on {} (model '{}' via {})",
        addr, args.model, args.ollama_url
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router(state))
        .await
        .context("server error")?;

    Ok(())
}
