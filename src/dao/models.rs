use serde::{Deserialize, Serialize};

/// Quiz definition as stored by the authoring side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizEntity {
    /// Stable identifier for the quiz.
    pub quiz_id: u64,
    /// Human readable quiz name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Questions in play order.
    pub questions: Vec<QuestionEntity>,
}

/// Question entry inside a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionEntity {
    /// Identifier of the question, unique within the quiz.
    pub question_id: u64,
    /// Question text.
    pub question: String,
    /// Answer window in seconds.
    pub duration: u64,
    /// Points awarded to fully correct answers.
    pub points: u32,
    /// Possible answers in display order.
    pub answers: Vec<AnswerEntity>,
}

/// Possible answer of a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerEntity {
    /// Identifier of the answer, unique within the question.
    pub answer_id: u64,
    /// Answer text.
    pub answer: String,
    /// Display colour.
    pub colour: String,
    /// Whether the answer is part of the correct set.
    pub correct: bool,
}
