// DownloadService against a fake final-generation endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use doc_preview_engine::config::PreviewConfig;
use doc_preview_engine::download::DownloadService;
use doc_preview_engine::error::PreviewError;
use doc_preview_engine::generator::http_generator::HttpGenerator;

const FINAL_BYTES: &[u8] = b"%PDF-1.7 final quality";

async fn document_handler(Json(_body): Json<Value>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        FINAL_BYTES.to_vec(),
    )
}

async fn failing_handler() -> impl IntoResponse {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": "generator offline" })),
    )
}

async fn start_service() -> SocketAddr {
    let app = Router::new()
        .route("/document", post(document_handler))
        .route("/fail", post(failing_handler));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

#[tokio::test]
async fn test_download_saves_named_file() {
    let addr = start_service().await;
    let dir = tempfile::tempdir().unwrap();

    let config = PreviewConfig {
        preview_endpoint: format!("http://{}/document", addr),
        document_endpoint: format!("http://{}/document", addr),
        save_dir: dir.path().to_str().unwrap().to_string(),
        ..PreviewConfig::default()
    };
    let service = DownloadService::from_config(Arc::new(HttpGenerator::new(&config)), &config);

    let path = service
        .download(&json!({"customer": "ada"}), "invoice")
        .await
        .unwrap();

    let filename = path.file_name().unwrap().to_str().unwrap();
    assert!(filename.starts_with("invoice_"));
    assert!(filename.ends_with(".pdf"));

    let saved = std::fs::read(&path).unwrap();
    assert_eq!(saved, FINAL_BYTES);

    // The short-lived download handle never outlives the save.
    assert_eq!(service.live_handles(), 0);
}

#[tokio::test]
async fn test_download_failure_surfaces_error() {
    let addr = start_service().await;
    let dir = tempfile::tempdir().unwrap();

    let config = PreviewConfig {
        preview_endpoint: format!("http://{}/fail", addr),
        document_endpoint: format!("http://{}/fail", addr),
        ..PreviewConfig::default()
    };
    let service = DownloadService::new(Arc::new(HttpGenerator::new(&config)), dir.path());

    let err = service.download(&json!({}), "invoice").await.unwrap_err();
    match err {
        PreviewError::DownloadFailed(message) => {
            assert!(message.contains("generator offline"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Nothing was saved.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_save_failure_reports() {
    let addr = start_service().await;

    let config = PreviewConfig {
        preview_endpoint: format!("http://{}/document", addr),
        document_endpoint: format!("http://{}/document", addr),
        ..PreviewConfig::default()
    };
    // A save directory that does not exist makes the write fail after a
    // successful generation.
    let service = DownloadService::new(
        Arc::new(HttpGenerator::new(&config)),
        "/nonexistent/preview-save-dir",
    );

    let err = service.download(&json!({}), "invoice").await.unwrap_err();
    assert!(matches!(err, PreviewError::DownloadFailed(_)));

    // Released even though the write failed.
    assert_eq!(service.live_handles(), 0);
}
