use tracing::info;

use crate::{
    dto::quiz::{QuizInput, QuizSummary},
    error::ServiceError,
    state::{
        SharedState,
        session::{QuizId, QuizSnapshot},
    },
};

/// Insert or replace the definition of `quiz_id`.
///
/// Running sessions keep the snapshot they were started with.
pub async fn upsert_quiz(
    state: &SharedState,
    quiz_id: QuizId,
    payload: QuizInput,
) -> Result<QuizSummary, ServiceError> {
    let entity = payload.into_entity(quiz_id);
    let summary = QuizSummary::from(&entity);
    state.quiz_store().save_quiz(entity).await?;

    info!(
        quiz_id,
        questions = summary.num_questions,
        "quiz definition stored"
    );
    Ok(summary)
}

/// Deep copy of the current definition of `quiz_id`.
pub async fn load_snapshot(
    state: &SharedState,
    quiz_id: QuizId,
) -> Result<QuizSnapshot, ServiceError> {
    state
        .quiz_store()
        .find_quiz(quiz_id)
        .await?
        .map(QuizSnapshot::from)
        .ok_or_else(|| ServiceError::NotFound(format!("quiz {quiz_id} not found")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dto::quiz::{AnswerInput, QuestionInput},
        state::AppState,
    };

    /// Quiz of `count` one-second questions worth 5 points. Question `n` has answers `n1`
    /// (correct) and `n2`.
    pub(crate) fn quiz_input(count: u64) -> QuizInput {
        QuizInput {
            name: "Capitals".into(),
            description: "Guess the capital".into(),
            questions: (1..=count)
                .map(|index| QuestionInput {
                    question_id: index,
                    question: format!("Capital number {index}?"),
                    duration: 1,
                    points: 5,
                    answers: vec![
                        AnswerInput {
                            answer_id: index * 10 + 1,
                            answer: "Paris".into(),
                            colour: "red".into(),
                            correct: true,
                        },
                        AnswerInput {
                            answer_id: index * 10 + 2,
                            answer: "Lyon".into(),
                            colour: "blue".into(),
                            correct: false,
                        },
                    ],
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn upsert_then_load_returns_a_copy() {
        let state = AppState::new(AppConfig::default());
        let summary = upsert_quiz(&state, 7, quiz_input(3)).await.unwrap();
        assert_eq!(summary.quiz_id, 7);
        assert_eq!(summary.num_questions, 3);
        assert_eq!(summary.duration, 3);

        let snapshot = load_snapshot(&state, 7).await.unwrap();
        assert_eq!(snapshot.quiz_id, 7);
        assert_eq!(snapshot.questions[1].correct_answer_ids(), vec![21]);

        upsert_quiz(&state, 7, quiz_input(1)).await.unwrap();
        assert_eq!(snapshot.num_questions(), 3);
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            load_snapshot(&state, 99).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
