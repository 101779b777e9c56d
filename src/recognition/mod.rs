mod http;

use async_trait::async_trait;
use std::time::Duration;

pub use http::HttpRecognitionClient;

/// Result type for recognition service calls
pub type RecognitionResult<T> = Result<T, RecognitionError>;

/// Errors that can occur while talking to the recognition service
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("request to recognition service failed: {0}")]
    Request(String),

    #[error("recognition service timed out after {0:?}")]
    Timeout(Duration),

    #[error("recognition service returned status {0}")]
    Status(u16),

    #[error("malformed reply from recognition service: {0:?}")]
    MalformedReply(String),
}

/// Frame forwarded during a proctored session
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub image: String,
    pub username: String,
    pub noise_violation: bool,
    pub reference: String,
}

/// Frame checked at enrollment or login.
/// Without a reference this is a plain detection check.
#[derive(Debug, Clone)]
pub struct ValidateRequest {
    pub image: String,
    pub username: Option<String>,
    pub reference: Option<String>,
}

/// External visual-analysis service. Replies are a single line of text.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    async fn capture(&self, request: CaptureRequest) -> RecognitionResult<String>;

    async fn validate(&self, request: ValidateRequest) -> RecognitionResult<String>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Reduce a raw reply body to its single line, rejecting anything else
pub(crate) fn single_line(body: &str) -> RecognitionResult<String> {
    let line = body.trim();
    if line.is_empty() || line.contains('\n') {
        return Err(RecognitionError::MalformedReply(body.to_string()));
    }
    Ok(line.to_string())
}
