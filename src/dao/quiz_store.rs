use dashmap::DashMap;
use futures::future::{self, BoxFuture};

use crate::dao::{models::QuizEntity, storage::StorageResult};

/// Abstraction over the source sessions snapshot their quiz from.
pub trait QuizStore: Send + Sync {
    /// Insert or replace a quiz definition.
    fn save_quiz(&self, quiz: QuizEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch the current definition of a quiz.
    fn find_quiz(&self, quiz_id: u64) -> BoxFuture<'static, StorageResult<Option<QuizEntity>>>;
}

/// Process-local quiz store.
#[derive(Debug, Default)]
pub struct InMemoryQuizStore {
    quizzes: DashMap<u64, QuizEntity>,
}

impl QuizStore for InMemoryQuizStore {
    fn save_quiz(&self, quiz: QuizEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.quizzes.insert(quiz.quiz_id, quiz);
        Box::pin(future::ready(Ok(())))
    }

    fn find_quiz(&self, quiz_id: u64) -> BoxFuture<'static, StorageResult<Option<QuizEntity>>> {
        let quiz = self.quizzes.get(&quiz_id).map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(quiz)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(name: &str) -> QuizEntity {
        QuizEntity {
            quiz_id: 4,
            name: name.into(),
            description: String::new(),
            questions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn save_replaces_previous_definition() {
        let store = InMemoryQuizStore::default();
        store.save_quiz(quiz("first")).await.unwrap();
        store.save_quiz(quiz("second")).await.unwrap();

        let found = store.find_quiz(4).await.unwrap().unwrap();
        assert_eq!(found.name, "second");
        assert!(store.find_quiz(5).await.unwrap().is_none());
    }
}
