use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::datamuse::WordLookup;
use crate::session::{Finder, SavedWords, SessionError, View};
use crate::words::LookupMode;

#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<Mutex<Finder>>,
}

#[derive(Debug, Deserialize)]
pub struct WordQuery {
    #[serde(default)]
    pub word: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub word: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveItemRequest {
    pub position: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse {
    pub words: Vec<String>,
    pub display: String,
}

impl From<&SavedWords> for SavedResponse {
    fn from(saved: &SavedWords) -> Self {
        Self {
            words: saved.words().to_vec(),
            display: saved.joined(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: SessionError) -> ApiError {
    let status = match &err {
        SessionError::EmptyWord => StatusCode::BAD_REQUEST,
        SessionError::NoSuchItem { .. } => StatusCode::NOT_FOUND,
        SessionError::Lookup(_) => StatusCode::BAD_GATEWAY,
        SessionError::Display(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

pub fn create_router(lookup: Arc<dyn WordLookup>) -> Router {
    let state = AppState {
        finder: Arc::new(Mutex::new(Finder::new(lookup))),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/view", get(get_view))
        .route("/api/rhymes", get(get_rhymes))
        .route("/api/synonyms", get(get_synonyms))
        .route("/api/saved", get(get_saved).post(save_word))
        .route("/api/saved/item", post(save_item))
        .with_state(state)
        .layer(cors)
}

/// GET /health - Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rhyme_finder",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/view - What is currently displayed
async fn get_view(State(state): State<AppState>) -> Json<View> {
    let finder = state.finder.lock().await;
    Json(finder.view().clone())
}

/// Runs the upstream fetch without holding the session lock, so other
/// routes stay responsive while the word API is slow.
async fn lookup(state: &AppState, word: &str, mode: LookupMode) -> Result<Json<View>, ApiError> {
    let pending = state
        .finder
        .lock()
        .await
        .begin(word, mode)
        .map_err(error_response)?;

    let result = pending.fetch().await;

    let mut finder = state.finder.lock().await;
    match finder.finish(pending, result) {
        Ok(view) => Ok(Json(view)),
        Err(e) => Err(error_response(e)),
    }
}

/// GET /api/rhymes?word= - Rhymes grouped by syllable count
async fn get_rhymes(
    State(state): State<AppState>,
    Query(query): Query<WordQuery>,
) -> Result<Json<View>, ApiError> {
    lookup(&state, &query.word, LookupMode::Rhymes).await
}

/// GET /api/synonyms?word= - Synonyms as a flat list
async fn get_synonyms(
    State(state): State<AppState>,
    Query(query): Query<WordQuery>,
) -> Result<Json<View>, ApiError> {
    lookup(&state, &query.word, LookupMode::Synonyms).await
}

/// GET /api/saved - Words saved this session
async fn get_saved(State(state): State<AppState>) -> Json<SavedResponse> {
    let finder = state.finder.lock().await;
    Json(SavedResponse::from(finder.saved()))
}

/// POST /api/saved - Save a word
async fn save_word(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<SavedResponse>, ApiError> {
    let mut finder = state.finder.lock().await;
    match finder.save(&request.word) {
        Ok(saved) => Ok(Json(SavedResponse::from(saved))),
        Err(e) => Err(error_response(e)),
    }
}

/// POST /api/saved/item - Save a word from the current list by position
async fn save_item(
    State(state): State<AppState>,
    Json(request): Json<SaveItemRequest>,
) -> Result<Json<SavedResponse>, ApiError> {
    let mut finder = state.finder.lock().await;
    match finder.save_item(request.position) {
        Ok(saved) => Ok(Json(SavedResponse::from(saved))),
        Err(e) => Err(error_response(e)),
    }
}

pub async fn serve(lookup: Arc<dyn WordLookup>, addr: &str) -> anyhow::Result<()> {
    let app = create_router(lookup);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
