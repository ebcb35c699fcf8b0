//! DTO definitions used by the player routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_unique_answer_ids,
    state::{
        session::{Message, PlayerId, Question, Session, SessionId},
        state_machine::SessionState,
    },
};

/// Request to join a session from its lobby.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    pub session_id: SessionId,
    /// Display name; a blank name gets a generated one.
    #[serde(default)]
    pub name: String,
}

/// Identifier assigned to a player who joined.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionResponse {
    pub player_id: PlayerId,
}

/// Progress of the session a player belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatusResponse {
    pub state: SessionState,
    pub num_questions: usize,
    pub at_question: usize,
}

impl From<&Session> for PlayerStatusResponse {
    fn from(session: &Session) -> Self {
        Self {
            state: session.state,
            num_questions: session.num_questions(),
            at_question: session.at_question,
        }
    }
}

/// Answer as shown to players, without its correctness.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnswer {
    pub answer_id: u64,
    pub answer: String,
    pub colour: String,
}

/// Current question as shown to players.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuestionResponse {
    pub question_id: u64,
    pub question: String,
    pub duration: u64,
    pub points: u32,
    pub answers: Vec<PlayerAnswer>,
}

impl From<&Question> for PlayerQuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.question_id,
            question: question.question.clone(),
            duration: question.duration,
            points: question.points,
            answers: question
                .answers
                .iter()
                .map(|answer| PlayerAnswer {
                    answer_id: answer.answer_id,
                    answer: answer.answer.clone(),
                    colour: answer.colour.clone(),
                })
                .collect(),
        }
    }
}

/// Answers selected for the open question.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmissionRequest {
    #[validate(length(min = 1), custom(function = "validate_unique_answer_ids"))]
    pub answer_ids: Vec<u64>,
}

/// Body of a chat message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageInput {
    pub message_body: String,
}

/// Request to post a chat message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub message: MessageInput,
}

/// Chat message as returned to players.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub message_body: String,
    pub player_id: PlayerId,
    pub player_name: String,
    /// Unix timestamp in seconds.
    pub time_sent: i64,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            message_body: message.message_body.clone(),
            player_id: message.player_id,
            player_name: message.player_name.clone(),
            time_sent: message.time_sent,
        }
    }
}

/// Chat log of a session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatMessagesResponse {
    pub messages: Vec<ChatMessage>,
}
