//! HTTP endpoints
//!
//! REST API under `/api/v1`. Conversation and weather routes require a valid
//! device bearer token; health, auth, and metrics are public.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use plushpal_agent::{AgentError, TurnInput, TurnRequest};
use plushpal_config::ServerConfig;
use plushpal_core::Intent;
use plushpal_tools::{StoryEntry, WeatherReport};

use crate::auth::DeviceClaims;
use crate::metrics::{metrics_handler, record_turn};
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server);

    Router::new()
        // Health
        .route("/api/v1/health", get(health_check))
        // Device auth
        .route("/api/v1/auth/device", post(authenticate_device))
        .route("/api/v1/auth/refresh", post(refresh_tokens))
        // Conversation pipeline
        .route("/api/v1/conversation", post(conversation))
        .route("/api/v1/audio/:audio_id", get(get_audio))
        .route("/api/v1/sessions/:session_id", delete(end_session))
        // Weather
        .route("/api/v1/weather", get(get_weather))
        // Story catalog
        .route("/api/v1/stories", get(list_story_series))
        .route("/api/v1/stories/:series_id", get(get_story_series))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    if !config.cors_enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        // toys talk to us directly; browsers only need CORS when configured
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

// --- Device auth ---

#[derive(Debug, Deserialize)]
struct DeviceAuthRequest {
    device_id: String,
    device_secret: String,
}

#[derive(Debug, Serialize)]
struct DeviceTokens {
    access_token: String,
    refresh_token: String,
    token_type: &'static str,
}

static OPEN_AUTH_WARNED: AtomicBool = AtomicBool::new(false);

async fn authenticate_device(
    State(state): State<AppState>,
    Json(request): Json<DeviceAuthRequest>,
) -> Result<Json<DeviceTokens>, ServerError> {
    match &state.settings.auth.device_secret {
        Some(expected) if expected != &request.device_secret => {
            return Err(ServerError::Auth("unknown device credentials".to_string()));
        }
        Some(_) => {}
        None => {
            if !OPEN_AUTH_WARNED.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    "no device_secret configured - accepting any device credentials"
                );
            }
        }
    }

    Ok(Json(DeviceTokens {
        access_token: state.auth.issue_access(&request.device_id)?,
        refresh_token: state.auth.issue_refresh(&request.device_id)?,
        token_type: "bearer",
    }))
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}

async fn refresh_tokens(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<DeviceTokens>, ServerError> {
    let claims = state.auth.verify_refresh(&request.refresh_token)?;

    Ok(Json(DeviceTokens {
        access_token: state.auth.issue_access(&claims.device_id)?,
        refresh_token: state.auth.issue_refresh(&claims.device_id)?,
        token_type: "bearer",
    }))
}

// --- Conversation ---

#[derive(Debug, Deserialize)]
struct ConversationRequest {
    device_id: String,
    session_id: String,
    /// Base64-encoded audio; mutually exclusive with `text`
    #[serde(default)]
    audio_data: Option<String>,
    /// Already-transcribed text
    #[serde(default)]
    text: Option<String>,
    #[serde(default = "default_sample_rate")]
    sample_rate: u32,
    #[serde(default)]
    #[allow(dead_code)]
    timestamp: Option<DateTime<Utc>>,
}

fn default_sample_rate() -> u32 {
    16000
}

#[derive(Debug, Serialize)]
struct ConversationResponse {
    session_id: String,
    transcript: String,
    response_text: String,
    intent: Intent,
    audio_url: Option<String>,
    timestamp: DateTime<Utc>,
}

async fn conversation(
    State(state): State<AppState>,
    claims: DeviceClaims,
    Json(request): Json<ConversationRequest>,
) -> Result<Json<ConversationResponse>, ServerError> {
    if claims.device_id != request.device_id {
        return Err(ServerError::Auth(
            "token does not belong to this device".to_string(),
        ));
    }

    let input = match (&request.audio_data, &request.text) {
        (Some(encoded), _) => {
            let bytes = BASE64
                .decode(encoded)
                .map_err(|e| ServerError::InvalidRequest(format!("invalid base64 audio: {}", e)))?;
            TurnInput::Audio {
                bytes,
                sample_rate: request.sample_rate,
            }
        }
        (None, Some(text)) => TurnInput::Text(text.clone()),
        (None, None) => {
            return Err(ServerError::InvalidRequest(
                "audio_data or text is required".to_string(),
            ));
        }
    };

    let started = Instant::now();
    let outcome = state
        .orchestrator
        .converse(TurnRequest {
            session_id: request.session_id.clone(),
            device_id: request.device_id.clone(),
            input,
            language_hint: None,
        })
        .await
        .map_err(|e| match e {
            AgentError::Transcription(cause) => ServerError::Transcription(cause.to_string()),
        })?;

    record_turn(
        &outcome.intent.to_string(),
        started.elapsed().as_millis() as f64,
        outcome.audio.is_some(),
    );

    let audio_url = outcome.audio.map(|audio| {
        let audio_id = uuid::Uuid::new_v4().to_string();
        state.audio_cache.insert(audio_id.clone(), audio);
        format!("/api/v1/audio/{}", audio_id)
    });

    Ok(Json(ConversationResponse {
        session_id: request.session_id,
        transcript: outcome.transcript,
        response_text: outcome.response_text,
        intent: outcome.intent,
        audio_url,
        timestamp: Utc::now(),
    }))
}

/// Serve synthesized audio once, then evict it
async fn get_audio(
    State(state): State<AppState>,
    Path(audio_id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let (_, audio) = state
        .audio_cache
        .remove(&audio_id)
        .ok_or_else(|| ServerError::NotFound(format!("audio {}", audio_id)))?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

async fn end_session(
    State(state): State<AppState>,
    claims: DeviceClaims,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    tracing::debug!(device_id = %claims.device_id, session_id = %session_id, "ending session");
    state
        .orchestrator
        .end_session(&session_id)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Weather ---

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    location: Option<String>,
}

async fn get_weather(
    State(state): State<AppState>,
    _claims: DeviceClaims,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, ServerError> {
    let location = query
        .location
        .unwrap_or_else(|| state.settings.weather.default_location.clone());

    let report = state
        .weather
        .get_weather(&location)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    Ok(Json(report))
}

// --- Story catalog ---

#[derive(Debug, Serialize)]
struct SeriesSummary {
    id: &'static str,
    name: &'static str,
    character: &'static str,
    theme: &'static str,
    story_count: usize,
}

async fn list_story_series() -> Json<Vec<SeriesSummary>> {
    let series = plushpal_tools::STORY_SERIES
        .iter()
        .map(|s| SeriesSummary {
            id: s.id,
            name: s.name,
            character: s.character,
            theme: s.theme,
            story_count: s.stories.len(),
        })
        .collect();
    Json(series)
}

async fn get_story_series(
    Path(series_id): Path<String>,
) -> Result<Json<&'static [StoryEntry]>, ServerError> {
    plushpal_tools::series(&series_id)
        .map(|s| Json(s.stories))
        .ok_or_else(|| ServerError::NotFound(format!("story series {}", series_id)))
}
