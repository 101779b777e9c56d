use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque ID types for readability
pub type QuestionId = u64;
pub type Username = String;
pub type ResultId = String;

/// Number of violations at which a session is terminated
pub const MAX_VIOLATIONS: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    /// Allotted time in seconds, always positive
    pub time_seconds: u32,
}

/// Per-user position in the question sequence
#[derive(Debug, Clone)]
pub struct Session {
    pub cursor: usize,
    /// Catalog as it looked when the session started
    pub questions: Vec<Question>,
    pub started_at: String,
}

/// Result of asking for the next question
#[derive(Debug, Clone, PartialEq)]
pub enum NextQuestion {
    Question(Question),
    NoQuestions,
    ExamOver,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamResult {
    pub id: ResultId,
    pub username: Username,
    pub score: u32,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViolationRecord {
    pub count: u32,
    pub last_kind: String,
    pub updated_at: String,
}

/// Enrolled reference face used by the recognition service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceFace {
    pub handle: String,
    pub enrolled_at: String,
}

/// Something the client or the vision pipeline flagged as a breach
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    FullscreenExit,
    TabChange,
    WindowChange,
    /// Label reported verbatim by the recognition service (noise, gaze, items)
    Reported(String),
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::FullscreenExit => f.write_str("FULLSCREEN_VIOLATION"),
            ViolationKind::TabChange => f.write_str("TAB_CHANGE_VIOLATION"),
            ViolationKind::WindowChange => f.write_str("WINDOW_CHANGE_VIOLATION"),
            ViolationKind::Reported(label) => f.write_str(label),
        }
    }
}

/// Signal handed back to the proctored client. Rendered as a single text line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProctorSignal {
    PassThrough(String),
    FaceMismatch,
    MultipleFaces,
    Violation { kind: String, count: u32 },
    MaxViolations,
}

impl ProctorSignal {
    /// Whether the client is expected to end the session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProctorSignal::FaceMismatch
                | ProctorSignal::MultipleFaces
                | ProctorSignal::MaxViolations
        )
    }
}

impl fmt::Display for ProctorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProctorSignal::PassThrough(reply) => f.write_str(reply),
            ProctorSignal::FaceMismatch => f.write_str("FACE_MISMATCH"),
            ProctorSignal::MultipleFaces => f.write_str("MULTIPLE_FACES"),
            ProctorSignal::Violation { kind, count } => write!(f, "VIOLATION:{}:{}", kind, count),
            ProctorSignal::MaxViolations => f.write_str("MAX_VIOLATIONS"),
        }
    }
}

/// Outcome of a narrow face check at enrollment or login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceCheck {
    FaceMatch,
    NoFaceMatch,
    FaceDetected,
    NoFaceDetected,
}

impl fmt::Display for FaceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            FaceCheck::FaceMatch => "FACE_MATCH",
            FaceCheck::NoFaceMatch => "NO_FACE_MATCH",
            FaceCheck::FaceDetected => "FACE_DETECTED",
            FaceCheck::NoFaceDetected => "NO_FACE_DETECTED",
        };
        f.write_str(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_format() {
        let signal = ProctorSignal::Violation {
            kind: "GAZE_VIOLATION".to_string(),
            count: 1,
        };
        assert_eq!(signal.to_string(), "VIOLATION:GAZE_VIOLATION:1");
        assert_eq!(ProctorSignal::MaxViolations.to_string(), "MAX_VIOLATIONS");
        assert_eq!(ProctorSignal::PassThrough("OK".into()).to_string(), "OK");
        assert!(!signal.is_terminal());
        assert!(ProctorSignal::FaceMismatch.is_terminal());
    }

    #[test]
    fn test_violation_kind_labels() {
        assert_eq!(ViolationKind::TabChange.to_string(), "TAB_CHANGE_VIOLATION");
        assert_eq!(
            ViolationKind::Reported("PROHIBITED_ITEM:phone".into()).to_string(),
            "PROHIBITED_ITEM:phone"
        );
    }
}
