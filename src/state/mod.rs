pub mod registry;
pub mod scoring;
pub mod session;
mod sse;
pub mod state_machine;
pub mod timer;
pub mod transitions;

use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    dao::quiz_store::{InMemoryQuizStore, QuizStore},
    error::ServiceError,
    state::{
        registry::{SessionHandle, SessionRegistry},
        session::{PlayerId, Session, SessionError, SessionId},
        state_machine::{SessionAction, SessionState},
    },
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

/// Central application state: configuration, the session registry, the quiz source and the
/// public event stream.
pub struct AppState {
    config: AppConfig,
    registry: SessionRegistry,
    quiz_store: Arc<dyn QuizStore>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] backed by an in-memory quiz store.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_quiz_store(config, Arc::new(InMemoryQuizStore::default()))
    }

    /// Construct a new [`AppState`] reading quizzes from `quiz_store`.
    pub fn with_quiz_store(config: AppConfig, quiz_store: Arc<dyn QuizStore>) -> SharedState {
        Arc::new(Self {
            registry: SessionRegistry::new(config.max_active_sessions_per_quiz()),
            sse: SseHub::new(config.sse_capacity()),
            config,
            quiz_store,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of every session started by this process.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Source of quiz snapshots.
    pub fn quiz_store(&self) -> &Arc<dyn QuizStore> {
        &self.quiz_store
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Resolve a session by id.
    pub fn session(&self, session_id: SessionId) -> Result<SessionHandle, ServiceError> {
        self.registry
            .get(session_id)
            .ok_or_else(|| ServiceError::NotFound(format!("session {session_id} not found")))
    }

    /// Resolve the session a player belongs to.
    pub fn session_of_player(&self, player_id: PlayerId) -> Result<SessionHandle, ServiceError> {
        self.registry
            .find_by_player(player_id)
            .ok_or_else(|| ServiceError::NotFound(format!("player {player_id} not found")))
    }

    /// Apply an admin action on an already locked session.
    ///
    /// Reaching `END` moves the session to the inactive partition while the lock is still
    /// held, so no other action can observe a half-ended session.
    pub fn apply_action(
        &self,
        handle: &SessionHandle,
        session: &mut Session,
        action: SessionAction,
    ) -> Result<SessionState, SessionError> {
        let next =
            transitions::apply_action(handle, session, action, self.config.countdown())?;

        if next == SessionState::End {
            self.registry
                .deactivate(handle.quiz_id(), handle.session_id());
            info!(
                quiz_id = handle.quiz_id(),
                session_id = handle.session_id(),
                "session ended"
            );
        }

        Ok(next)
    }

    /// Start the first question when the lobby reached its auto-start threshold.
    pub fn auto_start_if_ready(
        &self,
        handle: &SessionHandle,
        session: &mut Session,
    ) -> Result<(), SessionError> {
        if session.should_auto_start() {
            info!(
                session_id = session.session_id,
                players = session.players.len(),
                "auto-start threshold reached"
            );
            self.apply_action(handle, session, SessionAction::NextQuestion)?;
        }
        Ok(())
    }
}
