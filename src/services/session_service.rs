use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    dto::session::{
        FinalResultsResponse, QuestionResultSummary, SessionActionRequest, SessionActionResponse,
        SessionListResponse, SessionStatusResponse, StartSessionRequest, StartSessionResponse,
    },
    error::ServiceError,
    services::{quiz_service, sse_events::broadcast_session_state},
    state::{
        SharedState,
        registry::{SessionCell, SessionHandle},
        session::{QuizId, QuizSnapshot, Session, SessionError, SessionId},
    },
};

/// Active and inactive sessions of a quiz.
pub fn list_sessions(state: &SharedState, quiz_id: QuizId) -> SessionListResponse {
    state.registry().list(quiz_id).into()
}

/// Start a session over a fresh snapshot of `quiz_id`.
pub async fn start_session(
    state: &SharedState,
    quiz_id: QuizId,
    request: StartSessionRequest,
) -> Result<StartSessionResponse, ServiceError> {
    let max_auto_start = state.config().max_auto_start();
    if request.auto_start_num > max_auto_start {
        return Err(ServiceError::Capacity(format!(
            "autoStartNum must be at most {max_auto_start} (got {})",
            request.auto_start_num
        )));
    }

    let snapshot = quiz_service::load_snapshot(state, quiz_id).await?;
    let session_id = start_session_from_snapshot(state, snapshot, request.auto_start_num).await?;
    Ok(StartSessionResponse { session_id })
}

/// Register a new lobby session owning `snapshot`.
///
/// A threshold of zero advances to the first question right away.
pub async fn start_session_from_snapshot(
    state: &SharedState,
    snapshot: QuizSnapshot,
    auto_start: usize,
) -> Result<SessionId, ServiceError> {
    if snapshot.questions.is_empty() {
        return Err(ServiceError::Capacity(format!(
            "quiz {} has no questions",
            snapshot.quiz_id
        )));
    }

    let quiz_id = snapshot.quiz_id;
    let events = state.public_sse().clone();
    let mut opened = Ok(());
    let handle = state.registry().create(quiz_id, |session_id| {
        let handle = Arc::new(SessionCell::new(
            Session::new(session_id, snapshot, auto_start),
            events,
        ));
        opened = open_lobby(state, &handle);
        handle
    })?;
    opened?;

    Ok(handle.session_id())
}

/// Announce a new lobby and apply its auto-start threshold.
///
/// Runs before the cell is registered, so no join can reach the lobby first. Only
/// `NEXT_QUESTION` can be applied here, which never touches the registry.
fn open_lobby(state: &SharedState, handle: &SessionHandle) -> Result<(), SessionError> {
    // the cell is not shared yet
    let Some(mut session) = handle.try_lock() else {
        warn!(
            session_id = handle.session_id(),
            "new session already locked; skipping auto-start"
        );
        return Ok(());
    };

    info!(
        quiz_id = handle.quiz_id(),
        session_id = session.session_id,
        auto_start = session.auto_start,
        questions = session.num_questions(),
        "session started"
    );
    broadcast_session_state(handle.events(), &session);
    state.auto_start_if_ready(handle, &mut session)
}

/// Apply an admin action on a session of `quiz_id`.
pub async fn apply_action(
    state: &SharedState,
    quiz_id: QuizId,
    session_id: SessionId,
    request: SessionActionRequest,
) -> Result<SessionActionResponse, ServiceError> {
    let handle = admin_session(state, quiz_id, session_id)?;
    let mut session = handle.lock().await;
    let next = state.apply_action(&handle, &mut session, request.action)?;
    Ok(SessionActionResponse { state: next })
}

/// Current state, players and quiz snapshot of a session.
pub async fn session_status(
    state: &SharedState,
    quiz_id: QuizId,
    session_id: SessionId,
) -> Result<SessionStatusResponse, ServiceError> {
    let handle = admin_session(state, quiz_id, session_id)?;
    let session = handle.lock().await;
    Ok(SessionStatusResponse::from(&*session))
}

/// Result of the question at `position`, once revealed.
pub async fn question_result(
    state: &SharedState,
    quiz_id: QuizId,
    session_id: SessionId,
    position: usize,
) -> Result<QuestionResultSummary, ServiceError> {
    let handle = admin_session(state, quiz_id, session_id)?;
    let session = handle.lock().await;
    let result = session.question_result(position)?;
    Ok(result.into())
}

/// Scoreboard and every question result, in `FINAL_RESULTS` only.
pub async fn final_results(
    state: &SharedState,
    quiz_id: QuizId,
    session_id: SessionId,
) -> Result<FinalResultsResponse, ServiceError> {
    let handle = admin_session(state, quiz_id, session_id)?;
    let session = handle.lock().await;
    session.ensure_final_results()?;
    Ok(FinalResultsResponse::from(&*session))
}

/// Resolve a session and make sure it was started from `quiz_id`.
fn admin_session(
    state: &SharedState,
    quiz_id: QuizId,
    session_id: SessionId,
) -> Result<SessionHandle, ServiceError> {
    let handle = state.session(session_id)?;
    if handle.quiz_id() != quiz_id {
        return Err(ServiceError::NotFound(format!(
            "session {session_id} does not belong to quiz {quiz_id}"
        )));
    }
    Ok(handle)
}
