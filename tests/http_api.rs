//! HTTP adapter tests driven through the router with tower's `oneshot`,
//! no sockets involved.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;
use zip::write::FileOptions;

use ecolens::config::Config;
use ecolens::pipeline::{AuditPipeline, PipelineOptions};
use ecolens::providers::{CompletionError, CompletionProvider};
use ecolens::resolver::ArchiveResolver;
use ecolens::server::{router, AppState};

struct MockProvider;

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(r#"[{"problem": "Excessive polling"}]"#.to_string())
    }
}

fn build_zip(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("fixture.zip");
    let file = File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

fn test_state(dir: &TempDir) -> AppState {
    let mut config = Config::default();
    config.audit.reports_dir = dir.path().join("reports");
    config.audit.ignore_file = dir.path().join("ignore_list.txt");
    let pipeline = AuditPipeline::new(Arc::new(MockProvider), &config, PipelineOptions::service());
    AppState {
        pipeline: Arc::new(pipeline),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn home_serves_the_landing_page() {
    let dir = TempDir::new().unwrap();
    let app = router(test_state(&dir));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("analyze_repo"));
    assert!(html.contains("analyze_upload"));
}

/// Serve a stub GitHub (metadata + archive download) on a random port.
async fn spawn_github_stub(archive: Vec<u8>) -> String {
    let app = Router::new()
        .route(
            "/repos/{owner}/{repo}",
            get(|| async { Json(json!({ "default_branch": "main" })) }),
        )
        .route("/{owner}/{repo}/archive/refs/heads/{file}", {
            get(move || {
                let bytes = archive.clone();
                async move { bytes }
            })
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn analyze_repo_reports_the_repository_name() {
    let dir = TempDir::new().unwrap();
    let zip = build_zip(dir.path(), &[("repo/app.js", "setInterval(poll, 100)")]);
    let base = spawn_github_stub(std::fs::read(&zip).unwrap()).await;

    let mut config = Config::default();
    config.audit.reports_dir = dir.path().join("reports");
    config.audit.ignore_file = dir.path().join("ignore_list.txt");
    let pipeline = AuditPipeline::new(Arc::new(MockProvider), &config, PipelineOptions::service())
        .with_resolver(ArchiveResolver::with_bases(&base, &base));
    let app = router(AppState {
        pipeline: Arc::new(pipeline),
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze_repo")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "repo_url=https%3A%2F%2Fgithub.com%2Foctocat%2Fhello-world",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    // The repository name, not the submitted URL.
    assert_eq!(json["repo"], "hello-world");
    assert_eq!(json["file_count"], 1);
    assert_eq!(json["analysis"][0]["fileName"], "app.js");
}

#[tokio::test]
async fn invalid_repo_url_is_a_400() {
    let dir = TempDir::new().unwrap();
    let app = router(test_state(&dir));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze_repo")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("repo_url=https%3A%2F%2Fgitlab.com%2Fa%2Fb"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("invalid repository URL"));
}

#[tokio::test]
async fn upload_runs_the_pipeline_and_returns_the_analysis() {
    let dir = TempDir::new().unwrap();
    let archive = build_zip(dir.path(), &[("repo/app.js", "setInterval(poll, 100)")]);
    let bytes = std::fs::read(&archive).unwrap();
    let app = router(test_state(&dir));

    let boundary = "ecolens-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"demo.zip\"\r\nContent-Type: application/zip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze_upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["uploaded_file"], "demo.zip");
    assert_eq!(json["file_count"], 1);
    assert_eq!(json["analysis"][0]["fileName"], "app.js");
    assert_eq!(json["analysis"][0]["problem"], "Excessive polling");
}

#[tokio::test]
async fn upload_without_eligible_files_is_a_404() {
    let dir = TempDir::new().unwrap();
    let archive = build_zip(dir.path(), &[("repo/README.md", "# docs only")]);
    let bytes = std::fs::read(&archive).unwrap();
    let app = router(test_state(&dir));

    let boundary = "ecolens-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"docs.zip\"\r\nContent-Type: application/zip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze_upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("no eligible"));
}

#[tokio::test]
async fn corrupt_upload_is_a_400() {
    let dir = TempDir::new().unwrap();
    let app = router(test_state(&dir));

    let boundary = "ecolens-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"bad.zip\"\r\nContent-Type: application/zip\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"this is not a zip archive");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze_upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
