//! DTO definitions used by the admin session routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{
    registry::SessionListing,
    session::{
        AnswerBreakdown, Player, Question, QuestionResult, QuizSnapshot, Session, SessionId,
    },
    state_machine::{SessionAction, SessionState},
};

/// Request to start a new session of a quiz.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Player count that automatically starts the first question (0 starts immediately).
    pub auto_start_num: usize,
}

/// Identifier of a freshly started session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: SessionId,
}

/// Admin action to apply on a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionActionRequest {
    pub action: SessionAction,
}

/// State reached after applying an action.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionActionResponse {
    pub state: SessionState,
}

/// Active and inactive sessions of a quiz.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub active_sessions: Vec<SessionId>,
    pub inactive_sessions: Vec<SessionId>,
}

impl From<SessionListing> for SessionListResponse {
    fn from(listing: SessionListing) -> Self {
        Self {
            active_sessions: listing.active,
            inactive_sessions: listing.inactive,
        }
    }
}

/// Answer of a question including its correctness, for admins.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSnapshot {
    pub answer_id: u64,
    pub answer: String,
    pub colour: String,
    pub correct: bool,
}

/// Question of the session snapshot, for admins.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSnapshot {
    pub question_id: u64,
    pub question: String,
    pub duration: u64,
    pub points: u32,
    pub answers: Vec<AnswerSnapshot>,
}

impl From<&Question> for QuestionSnapshot {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.question_id,
            question: question.question.clone(),
            duration: question.duration,
            points: question.points,
            answers: question
                .answers
                .iter()
                .map(|answer| AnswerSnapshot {
                    answer_id: answer.answer_id,
                    answer: answer.answer.clone(),
                    colour: answer.colour.clone(),
                    correct: answer.correct,
                })
                .collect(),
        }
    }
}

/// Quiz snapshot a session runs on.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    pub quiz_id: u64,
    pub name: String,
    pub description: String,
    pub num_questions: usize,
    pub questions: Vec<QuestionSnapshot>,
    /// Total duration in seconds.
    pub duration: u64,
}

impl From<&QuizSnapshot> for QuizMetadata {
    fn from(quiz: &QuizSnapshot) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            name: quiz.name.clone(),
            description: quiz.description.clone(),
            num_questions: quiz.num_questions(),
            questions: quiz.questions.iter().map(Into::into).collect(),
            duration: quiz.duration(),
        }
    }
}

/// Status of a session as seen by admins.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub state: SessionState,
    pub at_question: usize,
    /// Player names in join order.
    pub players: Vec<String>,
    pub metadata: QuizMetadata,
}

impl From<&Session> for SessionStatusResponse {
    fn from(session: &Session) -> Self {
        Self {
            state: session.state,
            at_question: session.at_question,
            players: session
                .players
                .iter()
                .map(|player| player.name.clone())
                .collect(),
            metadata: (&session.metadata).into(),
        }
    }
}

/// Players who selected a correct answer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBreakdownSummary {
    pub answer_id: u64,
    pub players_correct: Vec<String>,
}

impl From<&AnswerBreakdown> for AnswerBreakdownSummary {
    fn from(breakdown: &AnswerBreakdown) -> Self {
        Self {
            answer_id: breakdown.answer_id,
            players_correct: breakdown.players_correct.clone(),
        }
    }
}

/// Result of a closed question.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResultSummary {
    pub question_id: u64,
    pub question_correct_breakdown: Vec<AnswerBreakdownSummary>,
    /// Mean answer time in seconds.
    pub average_answer_time: u64,
    /// Percentage of respondents who answered fully correctly.
    pub percent_correct: u64,
}

impl From<&QuestionResult> for QuestionResultSummary {
    fn from(result: &QuestionResult) -> Self {
        Self {
            question_id: result.question_id,
            question_correct_breakdown: result
                .question_correct_breakdown
                .iter()
                .map(Into::into)
                .collect(),
            average_answer_time: result.average_answer_time,
            percent_correct: result.percent_correct,
        }
    }
}

/// A player and their final score.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankedPlayer {
    pub name: String,
    pub score: f64,
}

impl From<&Player> for RankedPlayer {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            score: player.score,
        }
    }
}

/// Final scoreboard and per-question results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinalResultsResponse {
    pub ranked_players: Vec<RankedPlayer>,
    pub question_results: Vec<QuestionResultSummary>,
}

impl From<&Session> for FinalResultsResponse {
    fn from(session: &Session) -> Self {
        Self {
            ranked_players: session
                .ranked_players()
                .into_iter()
                .map(Into::into)
                .collect(),
            question_results: session.question_results.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::tests::sample_quiz;

    #[test]
    fn final_results_use_camel_case_keys() {
        let mut session = Session::new(3, sample_quiz(1), 10);
        session.add_player("alice", || 1).unwrap();
        session.add_player("bob", || 2).unwrap();
        session.players[1].score = 4.5;

        let json = serde_json::to_value(FinalResultsResponse::from(&session)).unwrap();

        assert_eq!(
            json["rankedPlayers"],
            serde_json::json!([
                { "name": "bob", "score": 4.5 },
                { "name": "alice", "score": 0.0 }
            ])
        );
        assert_eq!(json["questionResults"], serde_json::json!([]));
        assert!(json.get("usersRankedByScore").is_none());
    }
}
