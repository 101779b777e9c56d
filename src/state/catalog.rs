use super::AppState;
use crate::error::{ProctorError, ProctorResult};
use crate::types::*;

/// Split a comma separated option list, dropping blank entries
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an allotted time, which must be a positive whole number of seconds
pub fn parse_time_seconds(raw: &str) -> ProctorResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ProctorError::Validation(format!(
            "time must be a positive integer, got {:?}",
            raw
        ))),
    }
}

impl AppState {
    /// Append a question to the catalog with the next id
    pub async fn add_question(
        &self,
        text: String,
        options: Vec<String>,
        answer: String,
        time_seconds: u32,
    ) -> ProctorResult<Question> {
        if time_seconds == 0 {
            return Err(ProctorError::Validation(
                "time must be a positive integer".to_string(),
            ));
        }

        let mut exam = self.exam.lock().await;
        let question = Question {
            id: exam.next_question_id,
            text,
            options,
            answer,
            time_seconds,
        };
        exam.next_question_id += 1;
        exam.questions.push(question.clone());

        tracing::info!(id = question.id, total = exam.questions.len(), "Question added");
        Ok(question)
    }

    /// Snapshot of the catalog in order
    pub async fn list_questions(&self) -> Vec<Question> {
        self.exam.lock().await.questions.clone()
    }

    pub async fn delete_question(&self, id: QuestionId) -> ProctorResult<Question> {
        let mut exam = self.exam.lock().await;
        let index = exam
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| ProctorError::NotFound(format!("question {} not found", id)))?;

        let removed = exam.questions.remove(index);
        tracing::info!(id, total = exam.questions.len(), "Question deleted");
        Ok(removed)
    }
}
