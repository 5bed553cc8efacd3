//! Idle session eviction background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that evicts sessions nobody has touched for `ttl`
pub async fn session_reaper_task(state: Arc<AppState>, ttl: Duration, every: Duration) {
    info!(
        "Starting session reaper task (ttl={}s, interval={}s)",
        ttl.as_secs(),
        every.as_secs()
    );

    let mut interval = interval(every);

    loop {
        interval.tick().await;

        match state.store.evict_idle(ttl) {
            Ok(evicted) if evicted.is_empty() => {
                debug!("No idle sessions to evict");
            }
            Ok(evicted) => {
                info!("Evicted {} idle session(s): {:?}", evicted.len(), evicted);
            }
            Err(e) => {
                warn!("Failed to evict idle sessions: {}", e);
            }
        }
    }
}
