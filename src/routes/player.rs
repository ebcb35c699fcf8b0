use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_valid::Valid;

use crate::{
    dto::{
        player::{
            AnswerSubmissionRequest, ChatMessage, ChatMessagesResponse, JoinSessionRequest,
            JoinSessionResponse, PlayerQuestionResponse, PlayerStatusResponse, SendMessageRequest,
        },
        session::{FinalResultsResponse, QuestionResultSummary},
    },
    error::AppError,
    services::player_service,
    state::{SharedState, session::PlayerId},
};

/// Endpoints used by players during a session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/player/join", post(join))
        .route("/player/{playerid}", get(status))
        .route("/player/{playerid}/question/{position}", get(question_info))
        .route(
            "/player/{playerid}/question/{position}/answer",
            put(submit_answer),
        )
        .route(
            "/player/{playerid}/question/{position}/results",
            get(question_result),
        )
        .route("/player/{playerid}/results", get(final_results))
        .route(
            "/player/{playerid}/chat",
            get(messages).post(send_message),
        )
}

/// Join a session that is still in its lobby.
#[utoipa::path(
    post,
    path = "/player/join",
    tag = "player",
    request_body = JoinSessionRequest,
    responses(
        (status = 200, description = "Player joined", body = JoinSessionResponse),
        (status = 400, description = "Name already taken"),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Session already left its lobby")
    )
)]
pub async fn join(
    State(state): State<SharedState>,
    Json(payload): Json<JoinSessionRequest>,
) -> Result<Json<JoinSessionResponse>, AppError> {
    let response = player_service::join(&state, payload).await?;
    Ok(Json(response))
}

/// State and question position of the player's session.
#[utoipa::path(
    get,
    path = "/player/{playerid}",
    tag = "player",
    params(("playerid" = u64, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Session progress", body = PlayerStatusResponse),
        (status = 404, description = "Unknown player")
    )
)]
pub async fn status(
    State(state): State<SharedState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<PlayerStatusResponse>, AppError> {
    Ok(Json(player_service::status(&state, player_id).await?))
}

#[utoipa::path(
    get,
    path = "/player/{playerid}/question/{position}",
    tag = "player",
    params(
        ("playerid" = u64, Path, description = "Player identifier"),
        ("position" = usize, Path, description = "1-based question position")
    ),
    responses(
        (status = 200, description = "Current question", body = PlayerQuestionResponse),
        (status = 400, description = "Not the current question"),
        (status = 409, description = "Question hidden in the current state")
    )
)]
pub async fn question_info(
    State(state): State<SharedState>,
    Path((player_id, position)): Path<(PlayerId, usize)>,
) -> Result<Json<PlayerQuestionResponse>, AppError> {
    Ok(Json(
        player_service::question_info(&state, player_id, position).await?,
    ))
}

/// Submit or replace the player's answer to the open question.
#[utoipa::path(
    put,
    path = "/player/{playerid}/question/{position}/answer",
    tag = "player",
    params(
        ("playerid" = u64, Path, description = "Player identifier"),
        ("position" = usize, Path, description = "1-based question position")
    ),
    request_body = AnswerSubmissionRequest,
    responses(
        (status = 200, description = "Answer recorded"),
        (status = 400, description = "Invalid answers or position"),
        (status = 409, description = "Question is not open")
    )
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Path((player_id, position)): Path<(PlayerId, usize)>,
    Valid(Json(payload)): Valid<Json<AnswerSubmissionRequest>>,
) -> Result<StatusCode, AppError> {
    player_service::submit_answer(&state, player_id, position, payload).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/player/{playerid}/question/{position}/results",
    tag = "player",
    params(
        ("playerid" = u64, Path, description = "Player identifier"),
        ("position" = usize, Path, description = "1-based question position")
    ),
    responses(
        (status = 200, description = "Question result", body = QuestionResultSummary),
        (status = 409, description = "Result not revealed yet")
    )
)]
pub async fn question_result(
    State(state): State<SharedState>,
    Path((player_id, position)): Path<(PlayerId, usize)>,
) -> Result<Json<QuestionResultSummary>, AppError> {
    Ok(Json(
        player_service::question_result(&state, player_id, position).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/player/{playerid}/results",
    tag = "player",
    params(("playerid" = u64, Path, description = "Player identifier")),
    responses(
        (status = 200, description = "Final results", body = FinalResultsResponse),
        (status = 409, description = "Session is not showing final results")
    )
)]
pub async fn final_results(
    State(state): State<SharedState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<FinalResultsResponse>, AppError> {
    Ok(Json(player_service::final_results(&state, player_id).await?))
}

/// Chat log of the player's session.
#[utoipa::path(
    get,
    path = "/player/{playerid}/chat",
    tag = "player",
    params(("playerid" = u64, Path, description = "Player identifier")),
    responses((status = 200, description = "Chat messages", body = ChatMessagesResponse))
)]
pub async fn messages(
    State(state): State<SharedState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<ChatMessagesResponse>, AppError> {
    Ok(Json(player_service::messages(&state, player_id).await?))
}

/// Post a chat message to the player's session.
#[utoipa::path(
    post,
    path = "/player/{playerid}/chat",
    tag = "player",
    params(("playerid" = u64, Path, description = "Player identifier")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message posted", body = ChatMessage),
        (status = 400, description = "Empty or too long message")
    )
)]
pub async fn send_message(
    State(state): State<SharedState>,
    Path(player_id): Path<PlayerId>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    Ok(Json(
        player_service::send_message(&state, player_id, payload).await?,
    ))
}
