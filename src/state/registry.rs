use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::state::{
    SseHub,
    session::{PlayerId, QuizId, Session, SessionId},
};

/// Shared handle on a single session.
pub type SessionHandle = Arc<SessionCell>;

/// A session behind its own lock, so transitions of one session are serialised without
/// blocking any other session.
#[derive(Debug)]
pub struct SessionCell {
    session_id: SessionId,
    quiz_id: QuizId,
    session: Mutex<Session>,
    events: SseHub,
}

impl SessionCell {
    /// Wrap `session`, publishing its events on `events`.
    pub fn new(session: Session, events: SseHub) -> Self {
        Self {
            session_id: session.session_id,
            quiz_id: session.metadata.quiz_id,
            session: Mutex::new(session),
            events,
        }
    }

    /// Identifier of the wrapped session.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Quiz the session was started from.
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    /// Acquire exclusive access to the session.
    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().await
    }

    /// Exclusive access without waiting; `None` while another task holds the lock.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Session>> {
        self.session.try_lock().ok()
    }

    /// Event hub the session reports its changes to.
    pub fn events(&self) -> &SseHub {
        &self.events
    }
}

/// Errors raised when registering a new session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The quiz already runs the maximum number of active sessions.
    #[error("quiz {quiz_id} already has {limit} active sessions")]
    TooManyActiveSessions {
        /// Quiz the session was requested for.
        quiz_id: QuizId,
        /// Configured limit.
        limit: usize,
    },
}

#[derive(Debug, Default)]
struct QuizSessions {
    active: Vec<SessionId>,
    inactive: Vec<SessionId>,
}

/// Active and inactive session ids of a quiz, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionListing {
    /// Sessions that can still be advanced.
    pub active: Vec<SessionId>,
    /// Sessions that reached `END`.
    pub inactive: Vec<SessionId>,
}

/// Process-wide index of sessions and players.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionHandle>,
    quizzes: DashMap<QuizId, QuizSessions>,
    players: DashMap<PlayerId, SessionId>,
    next_session_id: AtomicU64,
    next_player_id: AtomicU64,
    max_active_per_quiz: usize,
}

impl SessionRegistry {
    /// Create an empty registry allowing `max_active_per_quiz` active sessions per quiz.
    pub fn new(max_active_per_quiz: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            quizzes: DashMap::new(),
            players: DashMap::new(),
            next_session_id: AtomicU64::new(1),
            next_player_id: AtomicU64::new(1),
            max_active_per_quiz,
        }
    }

    /// Allocate an id, build the session with it and register it as active.
    ///
    /// The capacity check and the insertion happen under the quiz entry lock, so concurrent
    /// starts cannot exceed the limit.
    pub fn create(
        &self,
        quiz_id: QuizId,
        build: impl FnOnce(SessionId) -> SessionHandle,
    ) -> Result<SessionHandle, RegistryError> {
        let mut entry = self.quizzes.entry(quiz_id).or_default();
        if entry.active.len() >= self.max_active_per_quiz {
            return Err(RegistryError::TooManyActiveSessions {
                quiz_id,
                limit: self.max_active_per_quiz,
            });
        }

        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        let handle = build(session_id);
        self.sessions.insert(session_id, handle.clone());
        entry.active.push(session_id);

        info!(quiz_id, session_id, "session registered");
        Ok(handle)
    }

    /// Look a session up by id.
    pub fn get(&self, session_id: SessionId) -> Option<SessionHandle> {
        self.sessions
            .get(&session_id)
            .map(|entry| entry.value().clone())
    }

    /// Look up the session a player joined.
    pub fn find_by_player(&self, player_id: PlayerId) -> Option<SessionHandle> {
        let session_id = *self.players.get(&player_id)?;
        self.get(session_id)
    }

    /// Allocate a fresh player id.
    pub fn allocate_player_id(&self) -> PlayerId {
        self.next_player_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Remember which session a player belongs to.
    pub fn register_player(&self, player_id: PlayerId, session_id: SessionId) {
        self.players.insert(player_id, session_id);
    }

    /// Move a session to the inactive partition of its quiz. Idempotent.
    pub fn deactivate(&self, quiz_id: QuizId, session_id: SessionId) {
        let mut entry = self.quizzes.entry(quiz_id).or_default();
        let before = entry.active.len();
        entry.active.retain(|id| *id != session_id);
        if entry.active.len() != before && !entry.inactive.contains(&session_id) {
            entry.inactive.push(session_id);
            info!(quiz_id, session_id, "session moved to inactive");
        }
    }

    /// Number of active sessions for `quiz_id`.
    pub fn active_count(&self, quiz_id: QuizId) -> usize {
        self.quizzes
            .get(&quiz_id)
            .map(|entry| entry.active.len())
            .unwrap_or(0)
    }

    /// Sorted active and inactive session ids for `quiz_id`.
    pub fn list(&self, quiz_id: QuizId) -> SessionListing {
        let Some(entry) = self.quizzes.get(&quiz_id) else {
            return SessionListing::default();
        };

        let mut active = entry.active.clone();
        let mut inactive = entry.inactive.clone();
        active.sort_unstable();
        inactive.sort_unstable();
        SessionListing { active, inactive }
    }
}
