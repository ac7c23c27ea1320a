//! HTTP service adapter.
//!
//! A thin axum layer over the audit pipeline: a landing page with two forms,
//! one route for GitHub URLs, one for uploaded archives. Both run the same
//! pipeline with the service options (5-file cap, no per-file artifacts).

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::collector::CollectError;
use crate::pipeline::{AuditPipeline, PipelineError};
use crate::report::sanitize_label;

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AuditPipeline>,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::Resolve(_) => ApiError::BadRequest(err.to_string()),
            PipelineError::Collect(CollectError::CorruptArchive { .. }) => {
                ApiError::BadRequest(err.to_string())
            }
            PipelineError::NoEligibleFiles => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

/// Build the router with permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/analyze_repo", post(analyze_repo))
        .route("/analyze_upload", post(analyze_upload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(addr: &str, state: AppState) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "listening");
    axum::serve(listener, router(state)).await
}

/// GET / — minimal landing page with both forms.
async fn home() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><title>ecolens</title></head>
<body>
<h1>ecolens</h1>
<p>Sustainability audit for JavaScript/TypeScript repositories.</p>
<h2>Analyze a GitHub repository</h2>
<form action="/analyze_repo" method="post">
  <input type="text" name="repo_url" placeholder="https://github.com/owner/repo" size="60">
  <button type="submit">Analyze</button>
</form>
<h2>Analyze an uploaded ZIP archive</h2>
<form action="/analyze_upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file" accept=".zip">
  <button type="submit">Analyze</button>
</form>
</body>
</html>"#,
    )
}

#[derive(Debug, Deserialize)]
struct AnalyzeRepoForm {
    repo_url: String,
}

/// POST /analyze_repo — audit a public GitHub repository.
async fn analyze_repo(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeRepoForm>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let outcome = state.pipeline.run_repo(&form.repo_url).await?;
    Ok(Json(json!({
        "repo": outcome.label,
        "file_count": outcome.file_count,
        "report_path": outcome.report_path,
        "analysis": outcome.issues,
    })))
}

/// POST /analyze_upload — audit an uploaded ZIP archive.
async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload.zip").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            upload = Some((name, bytes.to_vec()));
        }
    }
    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("missing 'file' field".to_string()))?;

    // Labels come from client-supplied filenames, so sanitize before they
    // become part of a report path.
    let label = sanitize_label(file_name.trim_end_matches(".zip"));
    let outcome = state.pipeline.run_archive_bytes(&bytes, &label).await?;

    Ok(Json(json!({
        "uploaded_file": file_name,
        "file_count": outcome.file_count,
        "report_path": outcome.report_path,
        "analysis": outcome.issues,
    })))
}
