//! Pomodoro Server - A session-based HTTP server for focus timers
//! 
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    config::Config,
    state::{AppState, SessionStore},
    api::create_router,
    tasks::session_reaper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, long break every {} cycles, classic stops after {}",
          config.host, config.port, config.long_break_interval, config.classic_cycles);
    info!("  CLASSIC:    work={}min, short={}min, long={}min",
          config.classic_work_minutes, config.classic_short_break_minutes, config.classic_long_break_minutes);
    info!("  CONTINUOUS: work={}min, short={}min, long={}min",
          config.continuous_work_minutes, config.continuous_short_break_minutes, config.continuous_long_break_minutes);

    // Reject bad durations before binding anything
    let profiles = config.mode_profiles()?;
    let store = SessionStore::new(profiles)?;
    let state = Arc::new(AppState::new(config.port, config.host.clone(), store));

    // Start the idle session reaper unless disabled
    match config.session_ttl() {
        Some(ttl) => {
            let reaper_state = Arc::clone(&state);
            let every = config.reap_interval();
            tokio::spawn(async move {
                session_reaper_task(reaper_state, ttl, every).await;
            });
        }
        None => info!("Session eviction disabled"),
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /api/pomodoro/create       - Create a timer session");
    info!("  POST   /api/pomodoro/:id/start    - Start or resume");
    info!("  POST   /api/pomodoro/:id/pause    - Pause");
    info!("  POST   /api/pomodoro/:id/reset    - Reset to idle");
    info!("  GET    /api/pomodoro/:id/info     - Timer snapshot");
    info!("  GET    /api/pomodoro/:id/status   - Snapshot and configuration");
    info!("  DELETE /api/pomodoro/:id          - Delete the session");
    info!("  GET    /api/pomodoro/health       - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
