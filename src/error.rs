use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{
    dao::storage::StorageError,
    state::{registry::RegistryError, session::SessionError},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Quiz source is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A limit on sessions or their settings would be exceeded.
    #[error("capacity exceeded: {0}")]
    Capacity(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::UnknownPlayer(_) => ServiceError::NotFound(message),
            SessionError::InvalidTransition(_)
            | SessionError::NoNextQuestion { .. }
            | SessionError::NotInLobby(_)
            | SessionError::AnswerWindowClosed(_)
            | SessionError::QuestionUnavailable(_)
            | SessionError::ResultsUnavailable(_) => ServiceError::InvalidState(message),
            SessionError::DuplicateName(_)
            | SessionError::QuestionPosition { .. }
            | SessionError::InvalidAnswer(_)
            | SessionError::InvalidMessage(_) => ServiceError::InvalidInput(message),
        }
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        ServiceError::Capacity(err.to_string())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Capacity(message) => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::state_machine::SessionState;

    #[test]
    fn session_errors_follow_the_taxonomy() {
        assert!(matches!(
            ServiceError::from(SessionError::UnknownPlayer(3)),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            ServiceError::from(SessionError::NoNextQuestion { at_question: 2 }),
            ServiceError::InvalidState(_)
        ));
        assert!(matches!(
            ServiceError::from(SessionError::AnswerWindowClosed(SessionState::Lobby)),
            ServiceError::InvalidState(_)
        ));
        assert!(matches!(
            ServiceError::from(SessionError::DuplicateName("ann".into())),
            ServiceError::InvalidInput(_)
        ));
    }

    #[test]
    fn app_errors_map_to_status_codes() {
        let response = AppError::from(ServiceError::Capacity("full".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(ServiceError::InvalidState("nope".into())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::from(ServiceError::NotFound("gone".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
