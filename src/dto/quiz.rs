//! DTOs describing the quiz definitions sessions are started from.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{AnswerEntity, QuestionEntity, QuizEntity},
    dto::validation::{validate_answers, validate_question_ids},
};

/// Full quiz definition registered before starting sessions.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizInput {
    #[validate(length(min = 1, max = 30))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub description: String,
    #[validate(
        length(min = 1, max = 50),
        nested,
        custom(function = "validate_question_ids")
    )]
    pub questions: Vec<QuestionInput>,
}

/// Question of a quiz definition.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub question_id: u64,
    #[validate(length(min = 1, max = 50))]
    pub question: String,
    /// Answer window in seconds.
    #[validate(range(min = 1))]
    pub duration: u64,
    #[validate(range(min = 1, max = 10))]
    pub points: u32,
    #[validate(length(min = 2, max = 6), custom(function = "validate_answers"))]
    pub answers: Vec<AnswerInput>,
}

/// Possible answer of a question definition.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub answer_id: u64,
    pub answer: String,
    #[serde(default = "default_colour")]
    pub colour: String,
    pub correct: bool,
}

fn default_colour() -> String {
    "red".into()
}

/// Summary returned once a quiz definition has been stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub quiz_id: u64,
    pub name: String,
    pub num_questions: usize,
    /// Total duration of the quiz in seconds.
    pub duration: u64,
}

impl QuizInput {
    /// Attach the quiz id taken from the request path.
    pub fn into_entity(self, quiz_id: u64) -> QuizEntity {
        QuizEntity {
            quiz_id,
            name: self.name,
            description: self.description,
            questions: self
                .questions
                .into_iter()
                .map(|question| QuestionEntity {
                    question_id: question.question_id,
                    question: question.question,
                    duration: question.duration,
                    points: question.points,
                    answers: question
                        .answers
                        .into_iter()
                        .map(|answer| AnswerEntity {
                            answer_id: answer.answer_id,
                            answer: answer.answer,
                            colour: answer.colour,
                            correct: answer.correct,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<&QuizEntity> for QuizSummary {
    fn from(quiz: &QuizEntity) -> Self {
        Self {
            quiz_id: quiz.quiz_id,
            name: quiz.name.clone(),
            num_questions: quiz.questions.len(),
            duration: quiz.questions.iter().map(|question| question.duration).sum(),
        }
    }
}
