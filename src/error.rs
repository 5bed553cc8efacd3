//! Error types shared by the timer engine, the session store and the API

use thiserror::Error;

use crate::state::TimerState;

/// Errors surfaced by timer and session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// No session is registered under the given id
    #[error("session not found: {0}")]
    NotFound(String),

    /// The operation is not allowed from the current state
    #[error("cannot {operation} a timer in state {from}")]
    InvalidTransition {
        from: TimerState,
        operation: &'static str,
    },

    /// Malformed timer mode, durations or request payload
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Lock poisoning or other failures that are not the caller's fault
    #[error("internal error: {0}")]
    Internal(String),
}

impl TimerError {
    /// Whether the error was caused by the client's request
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TimerError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, TimerError>;
