//! HTTP boundary: upload page, analysis endpoint, artifact downloads.
//!
//! This layer is thin plumbing over [`crate::analyze`] — it classifies
//! nothing and renders nothing itself. Its one responsibility is the
//! failure taxonomy: client mistakes (empty batch, unknown artifact name)
//! come back as 4xx, collaborator failures (Ollama down, implausible
//! answer) as 5xx, and neither ever surfaces as a raw internal panic.

use crate::analyze::analyze;
use crate::config::AnalysisConfig;
use crate::document::UploadedDocument;
use crate::error::CasebriefError;
use crate::output::AnalysisOutput;
use crate::pipeline::completion::CompletionClient;
use crate::storage::ArtifactStore;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

type ApiError = (StatusCode, Json<Value>);

/// Shared handler state: configuration plus the two injected seams.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AnalysisConfig>,
    pub client: Arc<dyn CompletionClient>,
    pub store: Arc<dyn ArtifactStore>,
}

/// Largest accepted upload batch, in bytes. Case files are text-heavy; 50 MB
/// covers multi-hundred-page filings with headroom.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/analyze", post(analyze_batch))
        .route("/download/{fname}", get(download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /analyze` — multipart batch of case files in, artifact locators out.
async fn analyze_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisOutput>, ApiError> {
    let mut documents: Vec<UploadedDocument> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("malformed multipart body: {e}")))?
    {
        // Accept every field that carries a file; browsers send them all
        // under the same "files" name, curl users under whatever they typed.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("failed to read upload '{filename}': {e}")))?;
        documents.push(UploadedDocument::new(filename, bytes.to_vec()));
    }

    info!("analyze request with {} file(s)", documents.len());

    analyze(documents, &state.config, &*state.client, &*state.store)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

/// `GET /download/{fname}` — exact-name artifact retrieval.
async fn download(
    State(state): State<AppState>,
    Path(fname): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.store.read(&fname).await.map_err(|e| error_response(&e))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&fname)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{fname}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Content type from the artifact extension; the store only ever holds
/// `.txt` and `.pdf`, but unknown names degrade to octet-stream.
fn content_type_for(name: &str) -> String {
    let mime = if name.ends_with(".pdf") {
        "application/pdf"
    } else if name.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    };
    mime.to_string()
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// Map a pipeline error onto the caller-facing failure taxonomy.
fn error_response(err: &CasebriefError) -> ApiError {
    let status = match err {
        CasebriefError::ArtifactNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// Embedded upload page. Kept intentionally minimal: pick files, post them,
/// link the two artifacts.
const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Casebrief</title>
  <style>
    body{font-family:system-ui,sans-serif;margin:0;background:#0b0f15;color:#e8eef6}
    .wrap{max-width:760px;margin:48px auto;padding:24px;background:#121826;border-radius:12px}
    h1{margin:0 0 4px;font-size:24px}
    p.mute{color:#9fb0c3;margin-top:4px}
    form{margin-top:16px;border:2px dashed #273245;padding:20px;border-radius:8px}
    input[type=file]{display:block;margin:8px 0 12px;width:100%}
    button{background:#4f46e5;border:none;color:#fff;padding:10px 16px;border-radius:8px;cursor:pointer}
    button:disabled{opacity:.6}
    .out{margin-top:16px;padding:12px;background:#0f1522;border-radius:8px;display:none}
    a{color:#8ab4ff}
  </style>
</head>
<body>
  <div class="wrap">
    <h1>Casebrief</h1>
    <p class="mute">Upload case files (PDF, DOCX, or TXT) and download a structured report.</p>
    <form id="f">
      <input type="file" id="files" name="files" multiple accept=".pdf,.docx,.txt" required />
      <button id="btn" type="submit">Analyze</button>
    </form>
    <div id="out" class="out"></div>
  </div>
<script>
const form = document.getElementById('f');
const out = document.getElementById('out');
const btn = document.getElementById('btn');
form.addEventListener('submit', async (e) => {
  e.preventDefault();
  const fd = new FormData();
  for (const file of document.getElementById('files').files) fd.append('files', file);
  btn.disabled = true; out.style.display = 'block'; out.textContent = 'Analyzing…';
  try {
    const res = await fetch('/analyze', { method: 'POST', body: fd });
    const data = await res.json();
    if (!res.ok) throw new Error(data.error || 'Server error');
    out.innerHTML = 'Done: <a href="/download/' + data.txt_file + '">TXT</a> · ' +
                    '<a href="/download/' + data.pdf_file + '">PDF</a> ' +
                    '(<code>' + data.base_name + '</code>)';
  } catch (err) {
    out.textContent = 'Error: ' + err.message;
  } finally {
    btn.disabled = false;
  }
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_match_artifact_extensions() {
        assert_eq!(content_type_for("r.pdf"), "application/pdf");
        assert_eq!(content_type_for("r.txt"), "text/plain; charset=utf-8");
        assert_eq!(content_type_for("r.bin"), "application/octet-stream");
    }

    #[test]
    fn failure_taxonomy_maps_to_status_codes() {
        let (status, _) = error_response(&CasebriefError::NoFiles);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&CasebriefError::ArtifactNotFound {
            name: "x.pdf".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(&CasebriefError::ServiceUnavailable {
            detail: "refused".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = error_response(&CasebriefError::EmptyCompletion { len: 2, min: 30 });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn router_builds_with_fakes() {
        use crate::pipeline::completion::ScriptedClient;
        use crate::storage::MemoryStore;

        let state = AppState {
            config: Arc::new(AnalysisConfig::default()),
            client: Arc::new(ScriptedClient::answering("a perfectly plausible report body")),
            store: Arc::new(MemoryStore::new()),
        };
        let _router = router(state);
    }
}
