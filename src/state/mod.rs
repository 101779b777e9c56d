mod catalog;
mod enrollment;
mod proctor;
mod score;
mod session;
mod violation;

pub use catalog::{parse_options, parse_time_seconds};
pub use proctor::validate_image;
pub use score::parse_answers;

use crate::recognition::RecognitionClient;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the engine tracks. Lives behind one lock in [`AppState`].
#[derive(Debug, Default)]
pub struct ExamState {
    pub questions: Vec<Question>,
    pub next_question_id: QuestionId,
    pub sessions: HashMap<Username, Session>,
    pub violations: HashMap<Username, ViolationRecord>,
    pub results: Vec<ExamResult>,
    pub references: HashMap<Username, ReferenceFace>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub exam: Arc<Mutex<ExamState>>,
    pub recognition: Arc<dyn RecognitionClient>,
}

impl AppState {
    pub fn new(recognition: Arc<dyn RecognitionClient>) -> Self {
        Self {
            exam: Arc::new(Mutex::new(ExamState::default())),
            recognition,
        }
    }
}

pub(crate) fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::recognition::testing::ScriptedClient;
    AppState::new(Arc::new(ScriptedClient::replying("OK")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_state_is_empty() {
        let state = test_state();
        let exam = state.exam.lock().await;

        assert!(exam.questions.is_empty());
        assert_eq!(exam.next_question_id, 0);
        assert!(exam.sessions.is_empty());
        assert!(exam.violations.is_empty());
        assert!(exam.results.is_empty());
        assert!(exam.references.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let state = test_state();
        let other = state.clone();

        state
            .add_question("Q".into(), vec!["A".into()], "A".into(), 30)
            .await
            .unwrap();

        assert_eq!(other.list_questions().await.len(), 1);
    }
}
