//! Proctor gateway: forwards frames to the recognition service and applies the outcome.
//!
//! The state lock is held only for the credential lookup and for the ledger update.
//! It is never held across the call to the recognition service.

use super::enrollment::no_reference;
use super::AppState;
use crate::error::{ProctorError, ProctorResult};
use crate::protocol::{parse_face_check, RecognitionOutcome};
use crate::recognition::{CaptureRequest, ValidateRequest};
use crate::types::*;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Check that a frame is a `data:<mime>;base64,<payload>` URL with a decodable payload
pub fn validate_image(image: &str) -> ProctorResult<()> {
    let malformed =
        |why: &str| ProctorError::Validation(format!("malformed image payload: {}", why));

    let (header, payload) = image
        .split_once(',')
        .ok_or_else(|| malformed("expected a data URL"))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(malformed("expected a base64 data URL"));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| malformed("payload is not base64"))?;
    if bytes.is_empty() {
        return Err(malformed("empty payload"));
    }
    Ok(())
}

impl AppState {
    /// Forward a proctoring frame and turn the service reply into a client signal
    pub async fn capture(
        &self,
        username: &str,
        image: String,
        noise_violation: bool,
    ) -> ProctorResult<ProctorSignal> {
        if username.trim().is_empty() {
            return Err(ProctorError::Validation("username is required".to_string()));
        }
        validate_image(&image)?;

        let reference = self
            .reference_for(username)
            .await
            .ok_or_else(|| no_reference(username))?;

        let reply = self
            .recognition
            .capture(CaptureRequest {
                image,
                username: username.to_string(),
                noise_violation,
                reference: reference.handle,
            })
            .await
            .map_err(|e| {
                tracing::error!(
                    username,
                    service = self.recognition.name(),
                    "Capture forwarding failed: {}",
                    e
                );
                e
            })?;

        let signal = match RecognitionOutcome::parse(&reply) {
            RecognitionOutcome::PassThrough(reply) => ProctorSignal::PassThrough(reply),
            RecognitionOutcome::Terminal(terminal) => terminal.into(),
            RecognitionOutcome::Violation(label) => self
                .exam
                .lock()
                .await
                .record_violation(username, &ViolationKind::Reported(label)),
        };

        if signal.is_terminal() {
            tracing::warn!(username, reply = %reply, signal = %signal, "Session must end");
        }
        Ok(signal)
    }

    /// Narrow face check that never touches the violation ledger.
    /// With a username the frame is compared to that user's reference face,
    /// otherwise the service only checks that a face is present.
    pub async fn validate_face(
        &self,
        image: String,
        username: Option<&str>,
    ) -> ProctorResult<FaceCheck> {
        validate_image(&image)?;

        let reference = match username {
            Some(username) => Some(
                self.reference_for(username)
                    .await
                    .ok_or_else(|| no_reference(username))?
                    .handle,
            ),
            None => None,
        };
        let against_reference = reference.is_some();

        let reply = self
            .recognition
            .validate(ValidateRequest {
                image,
                username: username.map(str::to_string),
                reference,
            })
            .await
            .map_err(|e| {
                tracing::error!(service = self.recognition.name(), "Face validation failed: {}", e);
                e
            })?;

        Ok(parse_face_check(&reply, against_reference)?)
    }
}
