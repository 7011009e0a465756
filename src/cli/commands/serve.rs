//! HTTP API server for integration with other systems.
//!
//! Provides REST endpoints for setup, queries and conversation memory.

use crate::cli::Output;
use crate::config::Settings;
use crate::conversation::MemoryEntry;
use crate::error::ParleyError;
use crate::orchestrator::{Orchestrator, SetupReport};
use crate::vector_store::SearchResult;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let app = router(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Parley API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Root", "GET    /");
    Output::kv("Setup (video)", "POST   /setup/youtube");
    Output::kv("Setup (text)", "POST   /setup/text");
    Output::kv("Query", "POST   /query");
    Output::kv("Memory", "GET    /memory");
    Output::kv("Clear Memory", "DELETE /memory");
    Output::kv("Status", "GET    /status");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around a shared session.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/setup/youtube", post(setup_youtube))
        .route("/setup/text", post(setup_text))
        .route("/query", post(query))
        .route("/memory", get(get_memory).delete(clear_memory))
        .route("/status", get(status))
        .layer(cors)
        .with_state(orchestrator)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoSetupRequest {
    /// YouTube URL or ID
    video_id: String,
    /// Falls back to the configured environment variable
    #[serde(default)]
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct TextSetupRequest {
    text: String,
    #[serde(default)]
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SetupResponse {
    message: String,
    #[serde(flatten)]
    report: SetupReport,
}

#[derive(Deserialize)]
struct QueryRequest {
    question: String,
}

#[derive(Serialize)]
struct QueryResponse {
    answer: String,
    conversation_history: Vec<MemoryEntry>,
    sources: Vec<SearchResult>,
}

#[derive(Serialize)]
struct MemoryResponse {
    conversation_history: Vec<MemoryEntry>,
    total_exchanges: usize,
}

#[derive(Serialize)]
struct StatusResponse {
    rag_initialized: bool,
    has_vectorstore: bool,
    memory_size: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(e: ParleyError) -> Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if e.is_setup() {
        info!("Setup rejected: {}", e);
    } else if status.is_server_error() {
        warn!("Request failed: {}", e);
    }
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

fn request_credential(explicit: Option<&str>, settings: &Settings) -> Result<String, ParleyError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    settings.credential_from_env().ok_or_else(|| {
        ParleyError::InvalidInput(format!(
            "api_key missing and {} is not set",
            settings.generation.api_key_env
        ))
    })
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Parley RAG API is running" }))
}

async fn setup_youtube(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(req): Json<VideoSetupRequest>,
) -> Response {
    let credential = match request_credential(req.api_key.as_deref(), orchestrator.settings()) {
        Ok(credential) => credential,
        Err(e) => return error_response(e),
    };

    match orchestrator.setup_from_source(&req.video_id, &credential).await {
        Ok(report) => Json(SetupResponse {
            message: "Video transcript indexed".to_string(),
            report,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn setup_text(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(req): Json<TextSetupRequest>,
) -> Response {
    let credential = match request_credential(req.api_key.as_deref(), orchestrator.settings()) {
        Ok(credential) => credential,
        Err(e) => return error_response(e),
    };

    match orchestrator.setup_from_text(&req.text, &credential).await {
        Ok(report) => Json(SetupResponse {
            message: "Text indexed".to_string(),
            report,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn query(State(orchestrator): State<Arc<Orchestrator>>, Json(req): Json<QueryRequest>) -> Response {
    match orchestrator.query(&req.question).await {
        Ok(response) => Json(QueryResponse {
            answer: response.answer,
            conversation_history: response.memory,
            sources: response.sources,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_memory(State(orchestrator): State<Arc<Orchestrator>>) -> Response {
    match orchestrator.get_memory().await {
        Ok(history) => Json(MemoryResponse {
            total_exchanges: history.len(),
            conversation_history: history,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn clear_memory(State(orchestrator): State<Arc<Orchestrator>>) -> Response {
    match orchestrator.clear_memory().await {
        Ok(()) => Json(serde_json::json!({ "message": "Conversation memory cleared" })).into_response(),
        Err(e) => error_response(e),
    }
}

async fn status(State(orchestrator): State<Arc<Orchestrator>>) -> impl IntoResponse {
    let status = orchestrator.get_status().await;
    Json(StatusResponse {
        rag_initialized: status.initialized,
        has_vectorstore: status.indexed,
        memory_size: status.memory_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::testing::{FakeProviders, StaticTranscripts};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let transcripts = StaticTranscripts::default().with("dQw4w9WgXcQ", "a video about rust");
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(FakeProviders::new()),
            Arc::new(transcripts),
        )
        .unwrap();
        router(Arc::new(orchestrator))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_root_and_initial_status() {
        let app = app();

        let (status, _) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rag_initialized"], false);
        assert_eq!(body["has_vectorstore"], false);
        assert_eq!(body["memory_size"], 0);
    }

    #[tokio::test]
    async fn test_query_before_setup_is_conflict() {
        let app = app();

        let (status, body) = send(&app, "POST", "/query", Some(serde_json::json!({ "question": "hi" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("Not initialized"));

        let (status, _) = send(&app, "GET", "/memory", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_text_setup_query_and_memory() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/setup/text",
            Some(serde_json::json!({ "text": "hello world", "api_key": "sk-test" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["segment_count"], 1);

        let (status, body) = send(&app, "POST", "/query", Some(serde_json::json!({ "question": "hello?" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "answer 1");
        assert_eq!(body["conversation_history"][0]["question"], "hello?");
        assert_eq!(body["sources"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, "GET", "/memory", None).await;
        assert_eq!(body["total_exchanges"], 1);

        let (status, _) = send(&app, "DELETE", "/memory", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(body["rag_initialized"], true);
        assert_eq!(body["memory_size"], 0);
    }

    #[tokio::test]
    async fn test_video_setup() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/setup/youtube",
            Some(serde_json::json!({ "video_id": "dQw4w9WgXcQ", "api_key": "sk-test" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"]["kind"], "video");
        assert_eq!(body["source"]["source_id"], "dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_empty_text_is_bad_request() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/setup/text",
            Some(serde_json::json!({ "text": "", "api_key": "sk-test" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }
}
