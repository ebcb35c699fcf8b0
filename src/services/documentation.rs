use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Quiz Live Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::quiz::upsert_quiz,
        crate::routes::admin::list_sessions,
        crate::routes::admin::start_session,
        crate::routes::admin::apply_action,
        crate::routes::admin::session_status,
        crate::routes::admin::question_result,
        crate::routes::admin::final_results,
        crate::routes::player::join,
        crate::routes::player::status,
        crate::routes::player::question_info,
        crate::routes::player::submit_answer,
        crate::routes::player::question_result,
        crate::routes::player::final_results,
        crate::routes::player::messages,
        crate::routes::player::send_message,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::quiz::QuizInput,
            crate::dto::quiz::QuestionInput,
            crate::dto::quiz::AnswerInput,
            crate::dto::quiz::QuizSummary,
            crate::dto::session::StartSessionRequest,
            crate::dto::session::StartSessionResponse,
            crate::dto::session::SessionActionRequest,
            crate::dto::session::SessionActionResponse,
            crate::dto::session::SessionListResponse,
            crate::dto::session::SessionStatusResponse,
            crate::dto::session::QuizMetadata,
            crate::dto::session::QuestionSnapshot,
            crate::dto::session::AnswerSnapshot,
            crate::dto::session::QuestionResultSummary,
            crate::dto::session::AnswerBreakdownSummary,
            crate::dto::session::FinalResultsResponse,
            crate::dto::session::RankedPlayer,
            crate::dto::player::JoinSessionRequest,
            crate::dto::player::JoinSessionResponse,
            crate::dto::player::PlayerStatusResponse,
            crate::dto::player::PlayerQuestionResponse,
            crate::dto::player::PlayerAnswer,
            crate::dto::player::AnswerSubmissionRequest,
            crate::dto::player::SendMessageRequest,
            crate::dto::player::MessageInput,
            crate::dto::player::ChatMessage,
            crate::dto::player::ChatMessagesResponse,
            crate::dto::sse::SessionStateEvent,
            crate::dto::sse::PlayerJoinedEvent,
            crate::state::state_machine::SessionState,
            crate::state::state_machine::SessionAction,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "quiz", description = "Quiz definitions"),
        (name = "admin", description = "Session control for quiz hosts"),
        (name = "player", description = "Lobby, answers and chat for players"),
    )
)]
pub struct ApiDoc;
