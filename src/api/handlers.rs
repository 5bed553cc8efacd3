//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{debug, error, info, warn};

use super::responses::{
    AckResponse, CreateSessionRequest, DurationsResponse, HealthResponse, StatusResponse,
    TimerResponse,
};
use crate::{
    error::TimerError,
    state::{AppState, TimerMode},
};

/// Log a failed request at a level matching whose fault it was
fn log_failure(action: &str, session_id: &str, e: &TimerError) {
    if e.is_client_error() {
        warn!("Failed to {} timer {}: {}", action, session_id, e);
    } else {
        error!("Failed to {} timer {}: {}", action, session_id, e);
    }
}

/// Handle POST /api/pomodoro/create - Create a session, or keep the existing one
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<AckResponse>, TimerError> {
    let Json(request) = payload.map_err(|rejection| {
        let e = TimerError::Configuration(rejection.body_text());
        log_failure("create", "<unparsed>", &e);
        e
    })?;

    let session_id = request.session_id.unwrap_or_default();
    let mode: TimerMode = request
        .timer_mode
        .ok_or_else(|| TimerError::Configuration("timerMode is required".to_string()))
        .and_then(|mode| mode.parse())
        .inspect_err(|e| log_failure("create", &session_id, e))?;

    let (session, created) = state
        .store
        .create_session(&session_id, mode)
        .inspect_err(|e| log_failure("create", &session_id, e))?;

    let existing_mode = session
        .lock()
        .map(|s| s.mode())
        .map_err(|e| TimerError::Internal(format!("Failed to lock session {}: {}", session_id, e)))
        .inspect_err(|e| log_failure("create", &session_id, e))?;

    if !created {
        info!("Create called for existing session {}, keeping it", session_id);
    }
    Ok(Json(AckResponse::created(session_id, existing_mode, created)))
}

/// Handle POST /api/pomodoro/:session_id/start - Start or resume the timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TimerResponse>, TimerError> {
    let (started, mode, info) = state
        .store
        .with_session(&session_id, |session, now| {
            let started = session.timer.start(now);
            (started, session.mode(), session.timer.snapshot(now))
        })
        .inspect_err(|e| log_failure("start", &session_id, e))?;

    if started {
        info!(
            "Timer {} started, state {}, {} remaining",
            session_id, info.current_state, info.remaining_time_formatted
        );
    } else {
        debug!("Timer {} already running", session_id);
    }
    Ok(Json(TimerResponse::new("Timer started", session_id, mode, info)))
}

/// Handle POST /api/pomodoro/:session_id/pause - Pause the running timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TimerResponse>, TimerError> {
    let (paused, mode, info) = state
        .store
        .with_session(&session_id, |session, now| {
            let paused = session.timer.pause(now);
            (paused, session.mode(), session.timer.snapshot(now))
        })
        .inspect_err(|e| log_failure("pause", &session_id, e))?;

    if paused {
        info!(
            "Timer {} paused with {} remaining",
            session_id, info.remaining_time_formatted
        );
    } else {
        debug!("Timer {} was not running, nothing to pause", session_id);
    }
    Ok(Json(TimerResponse::new("Timer paused", session_id, mode, info)))
}

/// Handle POST /api/pomodoro/:session_id/reset - Return the timer to idle
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TimerResponse>, TimerError> {
    let (mode, info) = state
        .store
        .with_session(&session_id, |session, now| {
            session.timer.reset();
            (session.mode(), session.timer.snapshot(now))
        })
        .inspect_err(|e| log_failure("reset", &session_id, e))?;

    info!("Timer {} reset", session_id);
    Ok(Json(TimerResponse::new("Timer reset", session_id, mode, info)))
}

/// Handle DELETE /api/pomodoro/:session_id - Remove the session
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<AckResponse>, TimerError> {
    let removed = state
        .store
        .delete_session(&session_id)
        .inspect_err(|e| log_failure("delete", &session_id, e))?;

    if !removed {
        warn!("Failed to delete timer {}: session not found", session_id);
        return Err(TimerError::NotFound(session_id));
    }
    Ok(Json(AckResponse::deleted(session_id)))
}

/// Handle GET /api/pomodoro/:session_id/info - Current timer snapshot
pub async fn info_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<TimerResponse>, TimerError> {
    let (mode, info) = state
        .store
        .with_session(&session_id, |session, now| {
            (session.mode(), session.timer.info(now))
        })
        .inspect_err(|e| log_failure("read", &session_id, e))?;

    Ok(Json(TimerResponse::new("Timer info", session_id, mode, info)))
}

/// Handle GET /api/pomodoro/:session_id/status - Snapshot plus session configuration
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusResponse>, TimerError> {
    let response = state
        .store
        .with_session(&session_id, |session, now| StatusResponse {
            success: true,
            session_id: session.id.clone(),
            timer_mode: session.mode(),
            created_at: session.created_at,
            info: session.timer.info(now),
            durations: DurationsResponse::new(session.timer.config(), session.mode()),
            timestamp: chrono::Utc::now(),
        })
        .inspect_err(|e| log_failure("read", &session_id, e))?;

    Ok(Json(response))
}

/// Handle GET /api/pomodoro/health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_sessions = state.store.len().unwrap_or_else(|e| {
        error!("Failed to count sessions: {}", e);
        0
    });
    Json(HealthResponse::ok(state.get_uptime(), active_sessions))
}
