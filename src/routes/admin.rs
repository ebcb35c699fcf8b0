use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::session::{
        FinalResultsResponse, QuestionResultSummary, SessionActionRequest, SessionActionResponse,
        SessionListResponse, SessionStatusResponse, StartSessionRequest, StartSessionResponse,
    },
    error::AppError,
    services::session_service,
    state::{
        SharedState,
        session::{QuizId, SessionId},
    },
};

/// Admin endpoints starting and driving the sessions of a quiz.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/quiz/{quizid}/sessions", get(list_sessions))
        .route("/admin/quiz/{quizid}/session/start", post(start_session))
        .route(
            "/admin/quiz/{quizid}/session/{sessionid}",
            get(session_status).put(apply_action),
        )
        .route(
            "/admin/quiz/{quizid}/session/{sessionid}/question/{position}/results",
            get(question_result),
        )
        .route(
            "/admin/quiz/{quizid}/session/{sessionid}/results",
            get(final_results),
        )
}

/// List the active and inactive sessions of a quiz.
#[utoipa::path(
    get,
    path = "/admin/quiz/{quizid}/sessions",
    tag = "admin",
    params(("quizid" = u64, Path, description = "Quiz identifier")),
    responses((status = 200, description = "Sessions of the quiz", body = SessionListResponse))
)]
pub async fn list_sessions(
    State(state): State<SharedState>,
    Path(quiz_id): Path<QuizId>,
) -> Json<SessionListResponse> {
    Json(session_service::list_sessions(&state, quiz_id))
}

/// Start a new session from the current definition of a quiz.
#[utoipa::path(
    post,
    path = "/admin/quiz/{quizid}/session/start",
    tag = "admin",
    params(("quizid" = u64, Path, description = "Quiz identifier")),
    request_body = StartSessionRequest,
    responses(
        (status = 200, description = "Session started", body = StartSessionResponse),
        (status = 400, description = "Too many active sessions, empty quiz or threshold too high"),
        (status = 404, description = "Unknown quiz")
    )
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Path(quiz_id): Path<QuizId>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, AppError> {
    let response = session_service::start_session(&state, quiz_id, payload).await?;
    Ok(Json(response))
}

/// Apply an admin action (`NEXT_QUESTION`, `GO_TO_ANSWER`, `GO_TO_FINAL_RESULTS`, `END`).
#[utoipa::path(
    put,
    path = "/admin/quiz/{quizid}/session/{sessionid}",
    tag = "admin",
    params(
        ("quizid" = u64, Path, description = "Quiz identifier"),
        ("sessionid" = u64, Path, description = "Session identifier")
    ),
    request_body = SessionActionRequest,
    responses(
        (status = 200, description = "Action applied", body = SessionActionResponse),
        (status = 404, description = "Unknown session"),
        (status = 409, description = "Action not allowed in the current state")
    )
)]
pub async fn apply_action(
    State(state): State<SharedState>,
    Path((quiz_id, session_id)): Path<(QuizId, SessionId)>,
    Json(payload): Json<SessionActionRequest>,
) -> Result<Json<SessionActionResponse>, AppError> {
    let response = session_service::apply_action(&state, quiz_id, session_id, payload).await?;
    Ok(Json(response))
}

/// Current state, players and quiz snapshot of a session.
#[utoipa::path(
    get,
    path = "/admin/quiz/{quizid}/session/{sessionid}",
    tag = "admin",
    params(
        ("quizid" = u64, Path, description = "Quiz identifier"),
        ("sessionid" = u64, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Session status", body = SessionStatusResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn session_status(
    State(state): State<SharedState>,
    Path((quiz_id, session_id)): Path<(QuizId, SessionId)>,
) -> Result<Json<SessionStatusResponse>, AppError> {
    let response = session_service::session_status(&state, quiz_id, session_id).await?;
    Ok(Json(response))
}

/// Result of a question once its answers were shown.
#[utoipa::path(
    get,
    path = "/admin/quiz/{quizid}/session/{sessionid}/question/{position}/results",
    tag = "admin",
    params(
        ("quizid" = u64, Path, description = "Quiz identifier"),
        ("sessionid" = u64, Path, description = "Session identifier"),
        ("position" = usize, Path, description = "1-based question position")
    ),
    responses(
        (status = 200, description = "Question result", body = QuestionResultSummary),
        (status = 409, description = "Result not revealed yet")
    )
)]
pub async fn question_result(
    State(state): State<SharedState>,
    Path((quiz_id, session_id, position)): Path<(QuizId, SessionId, usize)>,
) -> Result<Json<QuestionResultSummary>, AppError> {
    let response =
        session_service::question_result(&state, quiz_id, session_id, position).await?;
    Ok(Json(response))
}

/// Final scoreboard, available in `FINAL_RESULTS`.
#[utoipa::path(
    get,
    path = "/admin/quiz/{quizid}/session/{sessionid}/results",
    tag = "admin",
    params(
        ("quizid" = u64, Path, description = "Quiz identifier"),
        ("sessionid" = u64, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Final results", body = FinalResultsResponse),
        (status = 409, description = "Session is not showing final results")
    )
)]
pub async fn final_results(
    State(state): State<SharedState>,
    Path((quiz_id, session_id)): Path<(QuizId, SessionId)>,
) -> Result<Json<FinalResultsResponse>, AppError> {
    let response = session_service::final_results(&state, quiz_id, session_id).await?;
    Ok(Json(response))
}
