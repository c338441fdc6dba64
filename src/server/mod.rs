use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use crate::error::{ParseError, StoreError};
use crate::io::TranscriptStore;
use crate::models::{ParseConfig, TranscriptGraph};
use crate::parse::parse;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<TranscriptStore>,
    config: Arc<ParseConfig>,
}

impl AppState {
    pub fn new(store: TranscriptStore, config: ParseConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveTextRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SaveTextResponse {
    /// Name the raw text was stored under; use it to re-parse later.
    pub name: String,
    pub graph: TranscriptGraph,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::InputNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidName(_) => StatusCode::BAD_REQUEST,
            StoreError::Io(_) | StoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/transcripts", post(create_transcript))
        .route("/api/transcripts/{name}/parse", post(parse_transcript))
        .route("/api/graphs/{name}", get(get_graph))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Bind and run the server until it is shut down.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);
    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn root() -> &'static str {
    "colloquy: POST /api/transcripts, POST /api/transcripts/{name}/parse, GET /api/graphs/{name}"
}

async fn healthz() -> &'static str {
    "ok"
}

/// Store raw transcript text, parse it, and persist the graph. The
/// response carries the generated name so the caller can address the
/// transcript again.
async fn create_transcript(
    State(state): State<AppState>,
    Json(request): Json<SaveTextRequest>,
) -> std::result::Result<Json<SaveTextResponse>, AppError> {
    let graph = parse(&request.content, &state.config)?;
    let name = state.store.save_raw(&request.content)?;
    state.store.save_graph(&name, &graph)?;
    info!(%name, columns = graph.columns.len(), "stored and parsed transcript");
    Ok(Json(SaveTextResponse { name, graph }))
}

/// Re-parse a previously stored transcript and persist the fresh graph.
async fn parse_transcript(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> std::result::Result<Json<TranscriptGraph>, AppError> {
    let content = state.store.load_raw(&name)?;
    let graph = parse(&content, &state.config)?;
    state.store.save_graph(&name, &graph)?;
    Ok(Json(graph))
}

/// Fetch the latest graph saved under a name.
async fn get_graph(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> std::result::Result<Json<TranscriptGraph>, AppError> {
    Ok(Json(state.store.load_graph(&name)?))
}
