use super::{now, AppState};
use crate::error::{ProctorError, ProctorResult};
use crate::types::*;

impl AppState {
    /// Bind a user to their enrolled reference face, replacing any earlier binding
    pub async fn enroll_reference(
        &self,
        username: &str,
        handle: String,
    ) -> ProctorResult<ReferenceFace> {
        if username.trim().is_empty() || handle.trim().is_empty() {
            return Err(ProctorError::Validation(
                "username and reference are required".to_string(),
            ));
        }

        let reference = ReferenceFace {
            handle,
            enrolled_at: now(),
        };
        self.exam
            .lock()
            .await
            .references
            .insert(username.to_string(), reference.clone());

        tracing::info!(username, "Reference face enrolled");
        Ok(reference)
    }

    pub async fn deregister_reference(&self, username: &str) -> ProctorResult<ReferenceFace> {
        let removed = self.exam.lock().await.references.remove(username);
        match removed {
            Some(reference) => {
                tracing::info!(username, "Reference face removed");
                Ok(reference)
            }
            None => Err(no_reference(username)),
        }
    }

    pub async fn reference_for(&self, username: &str) -> Option<ReferenceFace> {
        self.exam.lock().await.references.get(username).cloned()
    }
}

pub(crate) fn no_reference(username: &str) -> ProctorError {
    ProctorError::NotFound(format!("no reference face found for user {}", username))
}
