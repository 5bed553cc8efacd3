//! In-memory session registry
//!
//! The registry map is locked only long enough to look up, insert or remove
//! a session handle. Timer operations run under the session's own mutex, so
//! requests for different sessions never wait on each other.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{
    clock::{Clock, SystemClock},
    timer_config::{ModeProfiles, TimerConfig, TimerMode},
    timer_state::Timer,
};
use crate::error::{Result, TimerError};

/// A client-identified timer and its bookkeeping
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_access: Instant,
    pub timer: Timer,
}

impl Session {
    fn new(id: String, mode: TimerMode, config: TimerConfig, now: Instant) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            last_access: now,
            timer: Timer::new(mode, config),
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.timer.mode()
    }
}

/// Shared handle to one session; the mutex serializes all operations on it
pub type SessionHandle = Arc<Mutex<Session>>;

/// Registry mapping session ids to timers
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    profiles: ModeProfiles,
    clock: Arc<dyn Clock>,
}

/// Ids that collide with fixed routes under `/api/pomodoro`
const RESERVED_IDS: [&str; 2] = ["create", "health"];

impl SessionStore {
    /// Create a store backed by the system clock
    pub fn new(profiles: impl Into<ModeProfiles>) -> Result<Self> {
        Self::with_clock(profiles, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source
    pub fn with_clock(profiles: impl Into<ModeProfiles>, clock: Arc<dyn Clock>) -> Result<Self> {
        let profiles = profiles.into();
        profiles.validate()?;
        Ok(Self {
            sessions: RwLock::new(HashMap::new()),
            profiles,
            clock,
        })
    }

    /// Register a session, or return the existing one untouched.
    /// The flag is true when a new session was created.
    pub fn create_session(&self, id: &str, mode: TimerMode) -> Result<(SessionHandle, bool)> {
        if id.trim().is_empty() {
            return Err(TimerError::Configuration(
                "session id must not be empty".to_string(),
            ));
        }
        if RESERVED_IDS.contains(&id) {
            return Err(TimerError::Configuration(format!(
                "session id '{}' is reserved",
                id
            )));
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))?;

        if let Some(existing) = sessions.get(id) {
            debug!("Session {} already exists, keeping it", id);
            // A busy session is being touched by its own request
            if let Ok(mut session) = existing.try_lock() {
                session.last_access = self.clock.now();
            }
            return Ok((Arc::clone(existing), false));
        }

        let session = Arc::new(Mutex::new(Session::new(
            id.to_string(),
            mode,
            self.profiles.for_mode(mode),
            self.clock.now(),
        )));
        sessions.insert(id.to_string(), Arc::clone(&session));
        info!("Created {} timer for session {}", mode, id);
        Ok((session, true))
    }

    /// Look up a session handle
    pub fn get_session(&self, id: &str) -> Result<SessionHandle> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))?;

        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| TimerError::NotFound(id.to_string()))
    }

    /// Remove a session. Unknown ids are ignored; returns whether one was removed.
    pub fn delete_session(&self, id: &str) -> Result<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))?;

        let removed = sessions.remove(id).is_some();
        if removed {
            info!("Deleted session {}", id);
        }
        Ok(removed)
    }

    /// Run `f` with exclusive access to a session and the current instant.
    /// Phase boundaries crossed since the last access are applied first.
    pub fn with_session<F, R>(&self, id: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut Session, Instant) -> R,
    {
        let handle = self.get_session(id)?;
        let mut session = handle
            .lock()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session {}: {}", id, e)))?;

        // The session may have been deleted or evicted while we waited for the lock
        if !self.is_registered(id, &handle)? {
            return Err(TimerError::NotFound(id.to_string()));
        }

        // Read the clock under the lock so instants seen by one session never go backwards
        let now = self.clock.now();
        session.last_access = now;

        let crossed = session.timer.advance(now);
        if crossed > 0 {
            info!(
                "Session {} advanced {} phase(s), now {}",
                id,
                crossed,
                session.timer.state()
            );
        }

        Ok(f(&mut *session, now))
    }

    /// Whether `handle` is still the session registered under `id`
    fn is_registered(&self, id: &str, handle: &SessionHandle) -> Result<bool> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))?;

        Ok(sessions
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current, handle)))
    }

    /// Drop sessions that have not been accessed for `ttl`.
    /// Sessions busy with a request are kept. Returns the evicted ids.
    pub fn evict_idle(&self, ttl: Duration) -> Result<Vec<String>> {
        let now = self.clock.now();
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))?;

        let mut evicted = Vec::new();
        sessions.retain(|id, handle| {
            let stale = match handle.try_lock() {
                Ok(session) => now.saturating_duration_since(session.last_access) >= ttl,
                Err(_) => false,
            };
            if stale {
                evicted.push(id.clone());
            }
            !stale
        });

        Ok(evicted)
    }

    /// Number of live sessions
    pub fn len(&self) -> Result<usize> {
        self.sessions
            .read()
            .map(|sessions| sessions.len())
            .map_err(|e| TimerError::Internal(format!("Failed to lock session registry: {}", e)))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }
}
