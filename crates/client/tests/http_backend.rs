use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ragdesk_client::{HealthStatus, HttpBackend, RagBackend};
use ragdesk_core::AppError;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct MockState {
    failing: bool,
    malformed: bool,
    questions: Arc<Mutex<Vec<String>>>,
    uploads: Arc<Mutex<Vec<(String, usize)>>>,
}

#[derive(Debug, Deserialize)]
struct AskBody {
    question: String,
}

fn failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn root(State(state): State<MockState>) -> Response {
    if state.failing {
        return failure();
    }
    "ok".into_response()
}

async fn ask(State(state): State<MockState>, Json(body): Json<AskBody>) -> Response {
    if state.failing {
        return failure();
    }
    if state.malformed {
        return "not json".into_response();
    }
    state
        .questions
        .lock()
        .expect("questions lock")
        .push(body.question);
    Json(json!({
        "answer": "X is Y",
        "sources": [["s1", "text A", {"source": "doc1.pdf"}]]
    }))
    .into_response()
}

async fn upload(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    if state.failing {
        return failure();
    }
    while let Some(field) = multipart.next_field().await.expect("read multipart field") {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.expect("read file bytes");
        state
            .uploads
            .lock()
            .expect("uploads lock")
            .push((filename.clone(), bytes.len()));
        return Json(json!({
            "status": "success",
            "filename": filename,
            "chunks_inserted": 12
        }))
        .into_response();
    }
    (StatusCode::UNPROCESSABLE_ENTITY, "missing file").into_response()
}

async fn documents(State(state): State<MockState>) -> Response {
    if state.failing {
        return failure();
    }
    Json(json!([
        {"document": "report.pdf", "chunks": 12},
        {"document": "policy.md", "chunks": 3}
    ]))
    .into_response()
}

async fn document_chunks(State(state): State<MockState>, Path(name): Path<String>) -> Response {
    if state.failing {
        return failure();
    }
    if state.malformed {
        return Json(json!({"chunks": 3})).into_response();
    }
    Json(json!({
        "document": name,
        "count": 1,
        "chunks": [{"id": format!("{name}_0"), "text": "first chunk", "metadata": {"source": name}}]
    }))
    .into_response()
}

async fn spawn_mock_server(failing: bool) -> (String, MockState, oneshot::Sender<()>) {
    spawn_with_state(MockState {
        failing,
        ..MockState::default()
    })
    .await
}

async fn spawn_with_state(state: MockState) -> (String, MockState, oneshot::Sender<()>) {
    let app = Router::new()
        .route("/", get(root))
        .route("/ask", post(ask))
        .route("/upload", post(upload))
        .route("/db/documents", get(documents))
        .route("/db/document/{name}", get(document_chunks))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server listener");
    let address: SocketAddr = listener.local_addr().expect("mock listener local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("run mock server");
    });
    (format!("http://{address}"), state, shutdown_tx)
}

#[tokio::test]
async fn health_probe_reports_ok_for_live_backend() {
    let (base_url, _state, _shutdown) = spawn_mock_server(false).await;
    let backend = HttpBackend::new(base_url).unwrap();

    assert_eq!(backend.check_health().await, HealthStatus::Ok);
}

#[tokio::test]
async fn health_probe_reports_unreachable_on_error_status() {
    let (base_url, _state, _shutdown) = spawn_mock_server(true).await;
    let backend = HttpBackend::new(base_url).unwrap();

    assert_eq!(backend.check_health().await, HealthStatus::Unreachable);
}

#[tokio::test]
async fn health_probe_reports_unreachable_without_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(format!("http://{address}")).unwrap();
    assert_eq!(backend.check_health().await, HealthStatus::Unreachable);
}

#[tokio::test]
async fn ask_posts_question_and_decodes_sources() {
    let (base_url, state, _shutdown) = spawn_mock_server(false).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let response = backend.ask("What is X?").await.unwrap();

    assert_eq!(response.answer.as_deref(), Some("X is Y"));
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.sources[0].id, "s1");
    assert_eq!(response.sources[0].text, "text A");
    assert_eq!(response.sources[0].source_name(), "doc1.pdf");
    assert_eq!(
        state.questions.lock().unwrap().as_slice(),
        ["What is X?".to_string()]
    );
}

#[tokio::test]
async fn ask_server_error_is_transport_failure() {
    let (base_url, _state, _shutdown) = spawn_mock_server(true).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let err = backend.ask("What is X?").await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let (base_url, state, _shutdown) = spawn_mock_server(false).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let receipt = backend
        .upload(b"%PDF-1.4 quarterly numbers".to_vec(), "report.pdf")
        .await
        .unwrap();

    assert_eq!(receipt.filename, "report.pdf");
    assert_eq!(receipt.chunks_inserted, 12);
    assert_eq!(
        state.uploads.lock().unwrap().as_slice(),
        [("report.pdf".to_string(), 26)]
    );
}

#[tokio::test]
async fn list_documents_maps_wire_names() {
    let (base_url, _state, _shutdown) = spawn_mock_server(false).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let documents = backend.list_documents().await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].name, "report.pdf");
    assert_eq!(documents[0].chunk_count, 12);
    assert_eq!(documents[1].name, "policy.md");
}

#[tokio::test]
async fn document_chunks_round_trip_encoded_names() {
    let (base_url, _state, _shutdown) = spawn_mock_server(false).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let listing = backend.get_document_chunks("Q3 report.pdf").await.unwrap();

    assert_eq!(listing.chunks.len(), 1);
    assert_eq!(listing.chunks[0].id, "Q3 report.pdf_0");
    assert_eq!(listing.chunks[0].metadata["source"], "Q3 report.pdf");
}

#[tokio::test]
async fn document_listing_failure_is_reported() {
    let (base_url, _state, _shutdown) = spawn_mock_server(true).await;
    let backend = HttpBackend::new(base_url).unwrap();

    assert!(backend.list_documents().await.is_err());
    assert!(backend.get_document_chunks("report.pdf").await.is_err());
}

#[tokio::test]
async fn upload_server_error_is_transport_failure() {
    let (base_url, state, _shutdown) = spawn_mock_server(true).await;
    let backend = HttpBackend::new(base_url).unwrap();

    let err = backend
        .upload(b"plain text".to_vec(), "notes.txt")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Transport(_)), "got {err:?}");
    assert!(state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_answer_is_protocol_error() {
    let (base_url, _state, _shutdown) = spawn_with_state(MockState {
        malformed: true,
        ..MockState::default()
    })
    .await;
    let backend = HttpBackend::new(base_url).unwrap();

    let err = backend.ask("What is X?").await.unwrap_err();
    assert!(matches!(err, AppError::Protocol(_)), "got {err:?}");
}

#[tokio::test]
async fn chunk_listing_with_wrong_shape_is_protocol_error() {
    let (base_url, _state, _shutdown) = spawn_with_state(MockState {
        malformed: true,
        ..MockState::default()
    })
    .await;
    let backend = HttpBackend::new(base_url).unwrap();

    let err = backend.get_document_chunks("report.pdf").await.unwrap_err();
    assert!(matches!(err, AppError::Protocol(_)), "got {err:?}");
}
