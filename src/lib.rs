//! Pomodoro Server - A session-based HTTP server for focus timers
//! 
//! This library keeps one countdown state machine per client session.
//! Remaining time is derived from stored instants on every request, so no
//! background thread ticks the timers.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, ModeProfiles, SessionStore, TimerConfig, TimerMode, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
