// HttpGenerator against a fake generation service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use doc_preview_engine::config::PreviewConfig;
use doc_preview_engine::generator::http_generator::HttpGenerator;
use doc_preview_engine::generator::traits::DocumentGenerator;

const PDF_BYTES: &[u8] = b"%PDF-1.7 generated";

#[derive(Clone, Default)]
struct Recorder {
    preview: Arc<Mutex<Vec<Value>>>,
    document: Arc<Mutex<Vec<Value>>>,
}

async fn preview_handler(
    State(recorder): State<Recorder>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    recorder.preview.lock().push(body);
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        PDF_BYTES.to_vec(),
    )
}

async fn document_handler(
    State(recorder): State<Recorder>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    recorder.document.lock().push(body);
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        PDF_BYTES.to_vec(),
    )
}

async fn failing_handler() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "template exploded" })),
    )
}

async fn start_service(recorder: Recorder) -> SocketAddr {
    let app = Router::new()
        .route("/preview", post(preview_handler))
        .route("/document", post(document_handler))
        .route("/fail", post(failing_handler))
        .with_state(recorder);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

fn config_for(addr: SocketAddr) -> PreviewConfig {
    PreviewConfig {
        preview_endpoint: format!("http://{}/preview", addr),
        document_endpoint: format!("http://{}/document", addr),
        ..PreviewConfig::default()
    }
}

#[tokio::test]
async fn test_generate_preview_posts_form_shape() {
    let recorder = Recorder::default();
    let addr = start_service(recorder.clone()).await;
    let generator = HttpGenerator::new(&config_for(addr));

    let bytes = generator
        .generate_preview("invoice", &json!({"customer": "ada", "amount": 12}))
        .await
        .unwrap();
    assert_eq!(bytes.as_ref(), PDF_BYTES);

    let recorded = recorder.preview.lock().clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["formType"], "invoice");
    assert_eq!(recorded[0]["data"]["customer"], "ada");
    assert_eq!(recorded[0]["data"]["amount"], 12);
}

#[tokio::test]
async fn test_generate_final_uses_document_endpoint() {
    let recorder = Recorder::default();
    let addr = start_service(recorder.clone()).await;
    let generator = HttpGenerator::new(&config_for(addr));

    generator
        .generate_final("contract", &json!({"party": "bob"}))
        .await
        .unwrap();

    assert_eq!(recorder.preview.lock().len(), 0);
    let recorded = recorder.document.lock().clone();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["formType"], "contract");
}

#[tokio::test]
async fn test_error_payload_surfaces_in_message() {
    let recorder = Recorder::default();
    let addr = start_service(recorder).await;
    let config = PreviewConfig {
        preview_endpoint: format!("http://{}/fail", addr),
        document_endpoint: format!("http://{}/fail", addr),
        ..PreviewConfig::default()
    };
    let generator = HttpGenerator::new(&config);

    let err = generator
        .generate_preview("invoice", &json!({}))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("template exploded"));
    assert!(message.contains("500"));
}
