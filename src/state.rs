//! Application state: the shared question list, asset lookup, and the HTTP session store.
//!
//! This module owns:
//!   - the parsed questions (read-only after startup, shared by every session)
//!   - the asset resolver built from config
//!   - per-session quiz state for HTTP clients, keyed by a uuid, with idle expiry
//!
//! WebSocket connections keep their session on the connection task instead of
//! in the store.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::assets::AssetResolver;
use crate::config::QuizConfig;
use crate::domain::Question;
use crate::error::QuizError;
use crate::loader::load_questions;
use crate::session::QuizSession;

/// A stored session plus the last time a request touched it.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session: QuizSession,
    pub touched: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self { session: QuizSession::new(), touched: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.touched) > ttl
    }
}

#[derive(Clone)]
pub struct AppState {
    pub questions: Arc<[Question]>,
    pub sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    pub assets: AssetResolver,
    pub config: QuizConfig,
}

impl AppState {
    /// Load the question source named in `config`. Fails if the source is missing or empty.
    #[instrument(level = "info", skip_all, fields(path = %config.questions_path.display()))]
    pub fn new(config: QuizConfig) -> Result<Self, QuizError> {
        let questions = load_questions(&config.questions_path)?;
        Ok(Self::with_questions(config, questions))
    }

    pub fn with_questions(config: QuizConfig, questions: Vec<Question>) -> Self {
        let assets = AssetResolver::new(config.asset_dir.clone(), config.placeholder_image.clone());
        info!(target: "mzquiz_backend", questions = questions.len(), asset_dir = %config.asset_dir.display(), session_ttl_secs = config.session_ttl_secs, "Quiz state ready");
        Self {
            questions: questions.into(),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            assets,
            config,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.config.session_ttl_secs)
    }

    /// Register a fresh session and return its id. Idle sessions are dropped first.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        evict_expired(&mut sessions, self.session_ttl(), Instant::now());
        sessions.insert(id.clone(), SessionEntry::new());
        debug!(target: "quiz", session = %id, live = sessions.len(), "Session created");
        id
    }

    /// Run `f` against the session with `id` and mark it as touched.
    /// An idle session is removed and reported as missing.
    ///
    /// `f` runs under the store's write lock, so it must not do I/O; render views
    /// from a snapshot after it returns.
    pub async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        if sessions.get(id).is_some_and(|e| e.is_expired(self.session_ttl(), now)) {
            sessions.remove(id);
            debug!(target: "quiz", session = %id, "Session expired");
            return None;
        }
        sessions.get_mut(id).map(|entry| {
            entry.touched = now;
            f(&mut entry.session)
        })
    }

    /// Copy of the session state, for rendering without holding the lock.
    pub async fn snapshot(&self, id: &str) -> Option<QuizSession> {
        self.with_session(id, |s| s.clone()).await
    }

    /// Drop every idle session. Returns how many were removed.
    #[instrument(level = "debug", skip(self))]
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let removed = evict_expired(&mut sessions, self.session_ttl(), Instant::now());
        if removed > 0 {
            debug!(target: "quiz", removed, live = sessions.len(), "Expired sessions swept");
        }
        removed
    }

    /// Discard a session. Returns false if it was unknown.
    #[instrument(level = "debug", skip(self))]
    pub async fn end_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        debug!(target: "quiz", session = %id, removed, "Session ended");
        removed
    }
}

fn evict_expired(sessions: &mut HashMap<String, SessionEntry>, ttl: Duration, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, e| !e.is_expired(ttl, now));
    before - sessions.len()
}
