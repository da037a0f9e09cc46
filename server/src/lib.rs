use anyhow::Result;
use axum::{extract::State, http::{HeaderValue, StatusCode}, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use procdraft_core::{Answer, DirectorySource, Engine, EngineConfig, EngineError, Query};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Origins of the local UI, allowed when CORS_ALLOW_ORIGIN is unset.
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub question: String,
    /// Kept as a string so an unknown mode is reported by name.
    pub mode: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub pdf_folder: String,
    pub pdf_count: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self { ApiError::Engine(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            ApiError::Engine(e) => {
                let status = match &e {
                    EngineError::Validation(_) => StatusCode::BAD_REQUEST,
                    EngineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    EngineError::Extraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, e.kind().to_string(), e.to_string())
            }
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, "internal".to_string(), detail),
        };
        if status.is_server_error() {
            tracing::error!(%error, %detail, "request failed");
        }
        (status, Json(ErrorBody { error, detail })).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Everything needed to build the router.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub docs_dir: PathBuf,
    pub engine: EngineConfig,
    /// Explicit CORS origins; `None` reads CORS_ALLOW_ORIGIN or falls back to the local UI.
    pub cors_origins: Option<Vec<String>>,
}

impl AppConfig {
    pub fn new<P: Into<PathBuf>>(docs_dir: P) -> Self {
        Self { docs_dir: docs_dir.into(), engine: EngineConfig::default(), cors_origins: None }
    }
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let source = Arc::new(DirectorySource::new(&config.docs_dir));
    let engine = Arc::new(Engine::new(source, config.engine.clone()));
    Ok(router(engine, cors_layer(config.cors_origins)))
}

/// Router over an existing engine; used by tests with in-memory sources.
pub fn router(engine: Arc<Engine>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/generate", post(generate_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn cors_layer(origins: Option<Vec<String>>) -> CorsLayer {
    let origins = origins.unwrap_or_else(|| match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => val.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect(),
        Err(_) => DEFAULT_ORIGINS.iter().map(|s| s.to_string()).collect(),
    });
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    if parsed.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(parsed)).allow_methods(Any).allow_headers(Any)
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let engine = state.engine.clone();
    let pdf_count = run_blocking(move || engine.health()).await?;
    Ok(Json(HealthResponse { ok: true, pdf_folder: state.engine.source().describe(), pdf_count }))
}

pub async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Answer>, ApiError> {
    let start = std::time::Instant::now();
    // Validation happens here, before any document is touched.
    let query = Query::parse(&req.question, &req.mode).map_err(EngineError::from)?;
    let engine = state.engine.clone();
    let answer = run_blocking(move || engine.query(&query)).await?;
    tracing::info!(sources = answer.sources.len(), took_s = start.elapsed().as_secs_f64(), "generated draft");
    Ok(Json(answer))
}

/// Runs engine work on the blocking pool; extraction and indexing are CPU bound.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> procdraft_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(join) => Err(ApiError::Internal(format!("engine task failed: {join}"))),
    }
}
