//! HTTP Server for the textprep API.
//!
//! # API Endpoints
//!
//! | Method | Path                | Description                              |
//! |--------|---------------------|------------------------------------------|
//! | GET    | `/health`           | Health check                             |
//! | GET    | `/api/instructions` | Instruction registry                     |
//! | POST   | `/api/validate`     | Validate instructions against a CSV      |
//! | POST   | `/api/preprocess`   | Validate and apply instructions to a CSV |
//! | GET    | `/api/logs`         | SSE stream for real-time logs            |
//!
//! Both POST routes take a multipart body with a `file` part (the CSV) and an
//! `instructions` part (the JSON document).

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{error_response, invalid_response, PreprocessResponse, ValidateResponse};
use crate::config::Settings;
use crate::error::{PipelineError, ServerError};
use crate::transform::dsl::Registry;
use crate::transform::pipeline::{check_bytes, preprocess_bytes};

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::Pipeline(PipelineError::Validation(report)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, invalid_response(report))
            }
            ServerError::Pipeline(
                PipelineError::Csv(_) | PipelineError::Document(_) | PipelineError::EmptyInput,
            )
            | ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, error_response(&self.to_string())),
            ServerError::Pipeline(_) | ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_response(&self.to_string()))
            }
        };
        (status, Json(body)).into_response()
    }
}

/// The router, without binding a socket.
pub fn router(max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/instructions", get(instructions))
        .route("/api/validate", post(validate_upload))
        .route("/api/preprocess", post(preprocess_upload))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(settings.max_upload_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    println!("🚀 textprep server running on http://localhost:{}", settings.port);
    println!("   GET  /api/instructions - Instruction registry");
    println!("   POST /api/validate     - Validate instructions (file + instructions)");
    println!("   POST /api/preprocess   - Preprocess a CSV (file + instructions)");
    println!("   GET  /api/logs         - SSE log stream");
    println!("   GET  /health           - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "textprep",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "instructions": "GET /api/instructions",
            "validate": "POST /api/validate",
            "preprocess": "POST /api/preprocess",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

async fn instructions() -> Json<Value> {
    Json(Registry::builtin().to_json())
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // lagged receivers just skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// The two parts every POST route expects.
struct Upload {
    file_name: Option<String>,
    csv: Vec<u8>,
    instructions: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServerError> {
    let mut file_name = None;
    let mut csv = None;
    let mut instructions = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                csv = Some(read_field(field).await?);
            }
            "instructions" => instructions = Some(read_field(field).await?),
            _ => {}
        }
    }

    Ok(Upload {
        file_name,
        csv: csv.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?,
        instructions: instructions
            .ok_or_else(|| ServerError::BadRequest("No instructions provided".into()))?,
    })
}

async fn read_field(field: axum::extract::multipart::Field<'_>) -> Result<Vec<u8>, ServerError> {
    field
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))
}

/// Validate an instruction document against an uploaded CSV
async fn validate_upload(multipart: Multipart) -> Result<Json<ValidateResponse>, ServerError> {
    let upload = read_upload(multipart).await?;

    let report = tokio::task::spawn_blocking(move || check_bytes(&upload.csv, &upload.instructions))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(Json(ValidateResponse::from(&report)))
}

/// Preprocess an uploaded CSV
async fn preprocess_upload(multipart: Multipart) -> Result<Json<PreprocessResponse>, ServerError> {
    let upload = read_upload(multipart).await?;
    log_info(format!(
        "New upload: {} ({} bytes)",
        upload.file_name.as_deref().unwrap_or("unknown"),
        upload.csv.len()
    ));

    let outcome = tokio::task::spawn_blocking(move || preprocess_bytes(&upload.csv, &upload.instructions))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| {
            log_error(format!("Preprocessing failed: {}", e));
            e
        })?;

    Ok(Json(PreprocessResponse::from(outcome)))
}
