use crate::domain::Pipeline;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 2 * 60 * 60;
const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 180;
const CLEANUP_INTERVAL_SECS: u64 = 300;

struct SessionEntry {
    pipeline: Pipeline,
    last_seen: Instant,
}

impl SessionEntry {
    fn fresh() -> Self {
        Self {
            pipeline: Pipeline::new(),
            last_seen: Instant::now(),
        }
    }
}

/// In-memory wizard sessions, one pipeline per browser session.
///
/// Entries are only borrowed inside [`SessionStore::update`]; callers never
/// hold one across an await point.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionEntry>>,
    last_cleanup: Arc<Mutex<Instant>>,
    idle_timeout: Duration,
    busy_timeout: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_idle_timeout(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS))
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
            idle_timeout,
            busy_timeout: Duration::from_secs(DEFAULT_BUSY_TIMEOUT_SECS),
        }
    }

    /// How long a session may sit in a working stage before it counts as
    /// abandoned. Should exceed the model request timeout.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Copy of the session's pipeline; unknown sessions read as idle.
    pub fn snapshot(&self, id: Uuid) -> Pipeline {
        self.sessions
            .get(&id)
            .map(|entry| entry.pipeline.clone())
            .unwrap_or_default()
    }

    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Pipeline) -> R) -> R {
        self.maybe_cleanup();

        let mut entry = self.sessions.entry(id).or_insert_with(SessionEntry::fresh);
        entry.last_seen = Instant::now();
        f(&mut entry.pipeline)
    }

    pub fn remove(&self, id: Uuid) {
        self.sessions.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn purge_idle(&self) -> usize {
        let before = self.sessions.len();
        let (idle, busy) = (self.idle_timeout, self.busy_timeout);
        // Busy sessions normally have a call in flight; only give up on them
        // once the call must have ended.
        self.sessions.retain(|_, entry| {
            let limit = if entry.pipeline.is_busy() { busy } else { idle };
            entry.last_seen.elapsed() <= limit
        });
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            tracing::info!(purged, "Purged idle wizard sessions");
        }
        purged
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self
            .last_cleanup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            *last_cleanup = Instant::now();
            drop(last_cleanup);
            self.purge_idle();
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
