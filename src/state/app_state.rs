//! Main application state shared with every request handler

use std::time::Instant;

use super::SessionStore;
use crate::utils::format::format_uptime;

/// Application state: the session store plus server metadata
#[derive(Debug)]
pub struct AppState {
    /// All timer sessions
    pub store: SessionStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create a new AppState around an existing store
    pub fn new(port: u16, host: String, store: SessionStore) -> Self {
        Self {
            store,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}
