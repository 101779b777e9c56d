//! Wire formats: recognition replies on the way in, JSON bodies for the HTTP API.

use crate::error::{ProctorError, ProctorResult};
use crate::recognition::{RecognitionError, RecognitionResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A recognition reply, parsed once at the boundary
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// Status line returned unchanged to the client
    PassThrough(String),
    /// Ends the session without touching the violation ledger
    Terminal(TerminalReply),
    /// Counts against the user; carries the reported label
    Violation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReply {
    FaceMismatch,
    MultipleFaces,
}

const VIOLATION_SUFFIX: &str = "_VIOLATION";
const PROHIBITED_ITEM: &str = "PROHIBITED_ITEM";

impl RecognitionOutcome {
    pub fn parse(reply: &str) -> Self {
        match reply {
            "FACE_MISMATCH" => RecognitionOutcome::Terminal(TerminalReply::FaceMismatch),
            "MULTIPLE_FACES" => RecognitionOutcome::Terminal(TerminalReply::MultipleFaces),
            r if r.ends_with(VIOLATION_SUFFIX) || r.contains(PROHIBITED_ITEM) => {
                RecognitionOutcome::Violation(r.to_string())
            }
            r => RecognitionOutcome::PassThrough(r.to_string()),
        }
    }
}

impl From<TerminalReply> for ProctorSignal {
    fn from(reply: TerminalReply) -> Self {
        match reply {
            TerminalReply::FaceMismatch => ProctorSignal::FaceMismatch,
            TerminalReply::MultipleFaces => ProctorSignal::MultipleFaces,
        }
    }
}

/// Interpret a validation reply. `against_reference` selects match vs detection tokens.
pub fn parse_face_check(reply: &str, against_reference: bool) -> RecognitionResult<FaceCheck> {
    let check = match (against_reference, reply) {
        (true, "FACE_MATCH" | "MATCH" | "OK") => FaceCheck::FaceMatch,
        (true, "NO_FACE_MATCH" | "FACE_MISMATCH" | "NO_MATCH") => FaceCheck::NoFaceMatch,
        (false, "FACE_DETECTED" | "OK") => FaceCheck::FaceDetected,
        (false, "NO_FACE_DETECTED" | "NO_FACE") => FaceCheck::NoFaceDetected,
        _ => return Err(RecognitionError::MalformedReply(reply.to_string())),
    };
    Ok(check)
}

// ========== HTTP request bodies ==========

/// Read as raw strings; bad values are reported by `noise_flag` and `AppState::capture`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureForm {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub username: String,
    pub noise_violation: Option<String>,
}

impl CaptureForm {
    /// The browser's noise flag. Absent or blank means no noise was heard.
    pub fn noise_flag(&self) -> ProctorResult<bool> {
        match self.noise_violation.as_deref().map(str::trim) {
            None | Some("") => Ok(false),
            Some(flag) if flag.eq_ignore_ascii_case("true") => Ok(true),
            Some(flag) if flag.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => Err(ProctorError::Validation(format!(
                "noise_violation must be true or false, got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateFaceForm {
    pub image: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsernameBody {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddQuestionRequest {
    pub text: String,
    /// Comma separated option list
    pub options: String,
    pub answer: String,
    /// Kept as text so malformed numbers are reported, not rejected by the extractor
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub username: String,
    /// Question position (as text) to chosen option
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub username: String,
    pub reference: String,
}

// ========== HTTP response bodies ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextQuestionResponse {
    Question { question: Question },
    NoQuestions,
    ExamOver,
}

impl From<NextQuestion> for NextQuestionResponse {
    fn from(next: NextQuestion) -> Self {
        match next {
            NextQuestion::Question(question) => NextQuestionResponse::Question { question },
            NextQuestion::NoQuestions => NextQuestionResponse::NoQuestions,
            NextQuestion::ExamOver => NextQuestionResponse::ExamOver,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartResponse {
    pub success: bool,
    pub questions: usize,
    pub started_at: String,
}

impl From<Session> for SessionStartResponse {
    fn from(session: Session) -> Self {
        Self {
            success: true,
            questions: session.questions.len(),
            started_at: session.started_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollResponse {
    pub success: bool,
    pub message: String,
    pub reference: ReferenceFace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub username: Username,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationStatus {
    pub username: Username,
    pub count: u32,
    pub terminated: bool,
    pub last_kind: Option<String>,
    pub updated_at: Option<String>,
}
