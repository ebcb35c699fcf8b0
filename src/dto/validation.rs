//! Validation helpers for DTOs.

use std::collections::HashSet;

use validator::ValidationError;

use crate::dto::quiz::{AnswerInput, QuestionInput};

/// Validates that the answers of a question have unique ids and texts, and that at least one
/// of them is correct.
pub fn validate_answers(answers: &[AnswerInput]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    let mut texts = HashSet::new();
    for answer in answers {
        if !ids.insert(answer.answer_id) {
            let mut err = ValidationError::new("answer_id_duplicate");
            err.message = Some(format!("answer id {} is used twice", answer.answer_id).into());
            return Err(err);
        }
        if !texts.insert(answer.answer.as_str()) {
            let mut err = ValidationError::new("answer_text_duplicate");
            err.message = Some(format!("answer `{}` is listed twice", answer.answer).into());
            return Err(err);
        }
    }

    if !answers.iter().any(|answer| answer.correct) {
        let mut err = ValidationError::new("answer_none_correct");
        err.message = Some("at least one answer must be correct".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that every question of a quiz has its own id.
pub fn validate_question_ids(questions: &[QuestionInput]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    if questions
        .iter()
        .all(|question| ids.insert(question.question_id))
    {
        Ok(())
    } else {
        let mut err = ValidationError::new("question_id_duplicate");
        err.message = Some("question ids must be unique within a quiz".into());
        Err(err)
    }
}

/// Validates that a submission does not select the same answer twice.
pub fn validate_unique_answer_ids(answer_ids: &[u64]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if answer_ids.iter().all(|id| seen.insert(*id)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("answer_ids_duplicate");
        err.message = Some("the same answer cannot be selected twice".into());
        Err(err)
    }
}
