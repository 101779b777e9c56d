use super::{now, AppState};
use crate::types::*;

impl AppState {
    /// Start (or restart) proctoring for a user.
    /// The cursor goes back to 0 and the session freezes the current catalog.
    pub async fn start_session(&self, username: &str) -> Session {
        let mut exam = self.exam.lock().await;
        let session = Session {
            cursor: 0,
            questions: exam.questions.clone(),
            started_at: now(),
        };
        exam.sessions.insert(username.to_string(), session.clone());

        tracing::info!(username, questions = session.questions.len(), "Session started");
        session
    }

    /// Hand out the next unseen question and advance the cursor in one step
    pub async fn next_question(&self, username: &str) -> NextQuestion {
        let mut exam = self.exam.lock().await;
        let exam = &mut *exam;

        let session = exam
            .sessions
            .entry(username.to_string())
            .or_insert_with(|| Session {
                cursor: 0,
                questions: exam.questions.clone(),
                started_at: now(),
            });

        // Nothing handed out yet, so picking up questions added since start is safe
        if session.questions.is_empty() {
            session.questions = exam.questions.clone();
        }

        if session.questions.is_empty() {
            return NextQuestion::NoQuestions;
        }

        match session.questions.get(session.cursor) {
            Some(question) => {
                let question = question.clone();
                session.cursor += 1;
                tracing::debug!(username, cursor = session.cursor, "Question handed out");
                NextQuestion::Question(question)
            }
            None => NextQuestion::ExamOver,
        }
    }

    /// Current cursor for a user, if a session exists
    pub async fn session_cursor(&self, username: &str) -> Option<usize> {
        self.exam
            .lock()
            .await
            .sessions
            .get(username)
            .map(|s| s.cursor)
    }
}
