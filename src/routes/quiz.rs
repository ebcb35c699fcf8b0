use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};
use axum_valid::Valid;

use crate::{
    dto::quiz::{QuizInput, QuizSummary},
    error::AppError,
    services::quiz_service,
    state::{SharedState, session::QuizId},
};

/// Quiz definition endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/quizzes/{quizid}", put(upsert_quiz))
}

/// Create or replace a quiz definition. Running sessions keep their snapshot.
#[utoipa::path(
    put,
    path = "/quizzes/{quizid}",
    tag = "quiz",
    params(("quizid" = u64, Path, description = "Quiz identifier")),
    request_body = QuizInput,
    responses(
        (status = 200, description = "Quiz stored", body = QuizSummary),
        (status = 400, description = "Invalid quiz definition"),
        (status = 503, description = "Quiz store unavailable")
    )
)]
pub async fn upsert_quiz(
    State(state): State<SharedState>,
    Path(quiz_id): Path<QuizId>,
    Valid(Json(payload)): Valid<Json<QuizInput>>,
) -> Result<Json<QuizSummary>, AppError> {
    let summary = quiz_service::upsert_quiz(&state, quiz_id, payload).await?;
    Ok(Json(summary))
}
