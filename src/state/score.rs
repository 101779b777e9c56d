use super::{now, AppState};
use crate::error::{ProctorError, ProctorResult};
use crate::types::*;
use std::collections::HashMap;

/// Count answers that exactly match the key at their position
fn grade(key: &[Question], answers: &HashMap<usize, String>) -> u32 {
    answers
        .iter()
        .filter(|(position, chosen)| {
            key.get(**position)
                .is_some_and(|question| question.answer == **chosen)
        })
        .count() as u32
}

/// Parse position keys sent as text ("0", "1", ...)
pub fn parse_answers(raw: HashMap<String, String>) -> ProctorResult<HashMap<usize, String>> {
    raw.into_iter()
        .map(|(position, chosen)| {
            position
                .trim()
                .parse::<usize>()
                .map(|p| (p, chosen))
                .map_err(|_| {
                    ProctorError::Validation(format!("invalid question position {:?}", position))
                })
        })
        .collect()
}

impl AppState {
    /// Score a submission and append it to the results.
    /// Graded against the user's session questions. Without a session, or with one that
    /// has not frozen any questions yet, the live catalog is the key.
    pub async fn submit_answers(
        &self,
        username: &str,
        answers: &HashMap<usize, String>,
    ) -> ExamResult {
        let mut exam = self.exam.lock().await;

        let score = match exam.sessions.get(username) {
            Some(session) if !session.questions.is_empty() => {
                grade(&session.questions, answers)
            }
            _ => grade(&exam.questions, answers),
        };

        let result = ExamResult {
            id: ulid::Ulid::new().to_string(),
            username: username.to_string(),
            score,
            submitted_at: now(),
        };
        exam.results.push(result.clone());

        tracing::info!(username, score, submissions = exam.results.len(), "Answers submitted");
        result
    }

    /// All results in submission order
    pub async fn list_results(&self) -> Vec<ExamResult> {
        self.exam.lock().await.results.clone()
    }

    /// First recorded score for a user
    pub async fn score_for(&self, username: &str) -> Option<u32> {
        self.exam
            .lock()
            .await
            .results
            .iter()
            .find(|r| r.username == username)
            .map(|r| r.score)
    }
}
