//! State management module
//!
//! This module contains the timer engine, the session registry and the
//! application state shared with the HTTP layer.

pub mod app_state;
pub mod clock;
pub mod session_store;
pub mod timer_config;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use session_store::{Session, SessionHandle, SessionStore};
pub use timer_config::{ModeProfiles, Phase, TimerConfig, TimerMode};
pub use timer_state::{Timer, TimerInfo, TimerState};
