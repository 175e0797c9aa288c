//! HTTP API for the game.
//!
//! Routes:
//! - GET  /health                          - Health check with player count
//! - GET  /api/players/search?q=           - Autocomplete, at most 10 players
//! - POST /api/guess                       - Grade a guess against today's player
//! - GET  /api/update-players?force=bool   - Refresh the roster when stale

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::daily::DailySelector;
use crate::game::{self, GameError};
use crate::ingest::RosterSource;
use crate::refresh::{RefreshOutcome, RefreshPolicy, refresh_roster};
use crate::store::PlayerStore;

/// Shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<PlayerStore>>,
    pub source: Arc<dyn RosterSource>,
    pub daily: DailySelector,
    pub refresh_days: i64,
    /// Pins "today" for tests; `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl AppState {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, PlayerStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("player store lock poisoned".to_string()))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/players/search", get(search_handler))
        .route("/api/guess", post(guess_handler))
        .route("/api/update-players", get(update_players_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    players: usize,
}

async fn health_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let players = state.lock_store()?.count().map_err(GameError::from)?;
    Ok(Json(HealthResponse {
        status: "ok",
        players,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.lock_store()?;
    let results = game::search_players(&store, &query.q)?;
    Ok(Json(results))
}

// A body without an id is a guess of nobody, answered like an unknown id.
#[derive(Debug, Default, Deserialize)]
pub struct GuessRequest {
    #[serde(default)]
    pub guess: GuessedPlayer,
}

#[derive(Debug, Default, Deserialize)]
pub struct GuessedPlayer {
    #[serde(default)]
    pub id: Option<i64>,
}

async fn guess_handler(
    State(state): State<AppState>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let Some(guessed_id) = body.guess.id else {
        return Err(ApiError::NotFound("Player not found".to_string()));
    };
    let today = state.today();
    let store = state.lock_store()?;
    let feedback = game::check_guess(&store, &state.daily, guessed_id, today)?;
    Ok(Json(feedback))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
struct UpdateResponse {
    message: String,
    #[serde(flatten)]
    outcome: RefreshOutcome,
}

async fn update_players_handler(
    State(state): State<AppState>,
    Query(query): Query<UpdateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let policy = RefreshPolicy {
        min_interval_days: state.refresh_days,
        force: query.force,
    };
    let today = state.today();
    let store = state.store.clone();
    let source = state.source.clone();

    // Scraping blocks and sleeps between requests.
    let outcome = tokio::task::spawn_blocking(move || {
        refresh_roster(&store, source.as_ref(), today, policy)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("refresh task failed: {err}")))?
    .map_err(|err| {
        error!("roster refresh failed: {err:#}");
        ApiError::Internal(format!("refresh failed: {err}"))
    })?;

    info!(?outcome, "update-players finished");
    Ok(Json(UpdateResponse {
        message: outcome.message(),
        outcome,
    }))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(StatusCode, String),
    NotFound(String),
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.status(), rejection.body_text())
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::PlayerNotFound(_) => ApiError::NotFound(err.to_string()),
            GameError::NoPlayers => ApiError::Internal(err.to_string()),
            GameError::Store(inner) => {
                error!("store error: {inner:#}");
                ApiError::Internal("Internal error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(status, msg) => (status, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}
