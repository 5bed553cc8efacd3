//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    state::{TimerConfig, TimerInfo, TimerMode},
};

/// Body of POST /api/pomodoro/create
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub session_id: Option<String>,
    pub timer_mode: Option<String>,
}

/// Acknowledgement for create and delete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_mode: Option<TimerMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

impl AckResponse {
    /// Acknowledge a create call; `created` is false when the session already existed
    pub fn created(session_id: String, timer_mode: TimerMode, created: bool) -> Self {
        let message = if created {
            "Timer created"
        } else {
            "Timer already exists"
        };
        Self {
            success: true,
            message: message.to_string(),
            session_id,
            timer_mode: Some(timer_mode),
            created: Some(created),
            timestamp: Utc::now(),
        }
    }

    /// Acknowledge a delete call
    pub fn deleted(session_id: String) -> Self {
        Self {
            success: true,
            message: "Timer deleted".to_string(),
            session_id,
            timer_mode: None,
            created: None,
            timestamp: Utc::now(),
        }
    }
}

/// Timer snapshot returned by start, pause, reset and info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    pub timer_mode: TimerMode,
    #[serde(flatten)]
    pub info: TimerInfo,
    pub timestamp: DateTime<Utc>,
}

impl TimerResponse {
    pub fn new(message: &str, session_id: String, timer_mode: TimerMode, info: TimerInfo) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            session_id,
            timer_mode,
            info,
            timestamp: Utc::now(),
        }
    }
}

/// Configured phase lengths in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationsResponse {
    pub work_time: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
    pub long_break_interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_limit: Option<u32>,
}

impl DurationsResponse {
    pub fn new(config: &TimerConfig, mode: TimerMode) -> Self {
        Self {
            work_time: config.work.as_secs(),
            short_break_duration: config.short_break.as_secs(),
            long_break_duration: config.long_break.as_secs(),
            long_break_interval: config.long_break_interval,
            cycle_limit: mode.cycle_limit(config),
        }
    }
}

/// Detailed session status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub session_id: String,
    pub timer_mode: TimerMode,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub info: TimerInfo,
    pub durations: DurationsResponse,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub active_sessions: usize,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String, active_sessions: usize) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            active_sessions,
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl TimerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TimerError::NotFound(_) => StatusCode::NOT_FOUND,
            TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TimerError::Configuration(_) => StatusCode::BAD_REQUEST,
            TimerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
