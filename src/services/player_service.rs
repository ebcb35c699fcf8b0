use time::OffsetDateTime;
use tokio::time::Instant;
use tracing::info;

use crate::{
    dto::{
        player::{
            AnswerSubmissionRequest, ChatMessage, ChatMessagesResponse, JoinSessionRequest,
            JoinSessionResponse, PlayerQuestionResponse, PlayerStatusResponse, SendMessageRequest,
        },
        session::{FinalResultsResponse, QuestionResultSummary},
    },
    error::ServiceError,
    services::sse_events::broadcast_player_joined,
    state::{SharedState, registry::SessionHandle, session::PlayerId},
};

/// Join a session lobby, starting the quiz when the auto-start threshold is reached.
pub async fn join(
    state: &SharedState,
    request: JoinSessionRequest,
) -> Result<JoinSessionResponse, ServiceError> {
    let handle = state.session(request.session_id)?;
    let mut session = handle.lock().await;

    let registry = state.registry();
    let player = session
        .add_player(&request.name, || registry.allocate_player_id())?
        .clone();
    registry.register_player(player.player_id, session.session_id);

    info!(
        session_id = session.session_id,
        player_id = player.player_id,
        name = %player.name,
        "player joined"
    );
    broadcast_player_joined(handle.events(), &session, &player);
    state.auto_start_if_ready(&handle, &mut session)?;

    Ok(JoinSessionResponse {
        player_id: player.player_id,
    })
}

/// State and progress of the player's session.
pub async fn status(
    state: &SharedState,
    player_id: PlayerId,
) -> Result<PlayerStatusResponse, ServiceError> {
    let handle = player_session(state, player_id)?;
    let session = handle.lock().await;
    session.player(player_id)?;
    Ok(PlayerStatusResponse::from(&*session))
}

/// Current question without its correct answers.
pub async fn question_info(
    state: &SharedState,
    player_id: PlayerId,
    position: usize,
) -> Result<PlayerQuestionResponse, ServiceError> {
    let handle = player_session(state, player_id)?;
    let session = handle.lock().await;
    session.player(player_id)?;
    let question = session.question_for_player(position)?;
    Ok(question.into())
}

/// Record the player's answer for the open question.
pub async fn submit_answer(
    state: &SharedState,
    player_id: PlayerId,
    position: usize,
    request: AnswerSubmissionRequest,
) -> Result<(), ServiceError> {
    let handle = player_session(state, player_id)?;
    let mut session = handle.lock().await;
    session.submit_answer(player_id, position, &request.answer_ids, Instant::now())?;
    Ok(())
}

/// Result of a revealed question, as seen from the player's session.
pub async fn question_result(
    state: &SharedState,
    player_id: PlayerId,
    position: usize,
) -> Result<QuestionResultSummary, ServiceError> {
    let handle = player_session(state, player_id)?;
    let session = handle.lock().await;
    session.player(player_id)?;
    Ok(session.question_result(position)?.into())
}

/// Final scoreboard of the player's session.
pub async fn final_results(
    state: &SharedState,
    player_id: PlayerId,
) -> Result<FinalResultsResponse, ServiceError> {
    let handle = player_session(state, player_id)?;
    let session = handle.lock().await;
    session.player(player_id)?;
    session.ensure_final_results()?;
    Ok(FinalResultsResponse::from(&*session))
}

/// Post a chat message to the player's session.
pub async fn send_message(
    state: &SharedState,
    player_id: PlayerId,
    request: SendMessageRequest,
) -> Result<ChatMessage, ServiceError> {
    let handle = player_session(state, player_id)?;
    let mut session = handle.lock().await;
    let message = session.send_message(
        player_id,
        &request.message.message_body,
        state.config().max_message_length(),
        OffsetDateTime::now_utc().unix_timestamp(),
    )?;
    Ok(message.into())
}

/// Chat log of the player's session, oldest first.
pub async fn messages(
    state: &SharedState,
    player_id: PlayerId,
) -> Result<ChatMessagesResponse, ServiceError> {
    let handle = player_session(state, player_id)?;
    let session = handle.lock().await;
    session.player(player_id)?;
    Ok(ChatMessagesResponse {
        messages: session.messages.iter().map(Into::into).collect(),
    })
}

fn player_session(state: &SharedState, player_id: PlayerId) -> Result<SessionHandle, ServiceError> {
    state.session_of_player(player_id)
}
