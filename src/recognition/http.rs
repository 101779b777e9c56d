use super::*;
use std::time::Instant;

/// Recognition service reached over HTTP with url-encoded forms
pub struct HttpRecognitionClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpRecognitionClient {
    /// Create a client for the service at `base_url`.
    /// Every call is bounded by `timeout`.
    pub fn new(base_url: String, timeout: Duration) -> RecognitionResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RecognitionError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> RecognitionResult<String> {
        let start = Instant::now();
        let url = format!("{}/{}", self.base_url, path);

        let response = tokio::time::timeout(self.timeout, self.client.post(&url).form(form).send())
            .await
            .map_err(|_| RecognitionError::Timeout(self.timeout))?
            .map_err(|e| RecognitionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RecognitionError::Status(response.status().as_u16()));
        }

        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| RecognitionError::Timeout(self.timeout))?
            .map_err(|e| RecognitionError::Request(e.to_string()))?;

        tracing::debug!(
            path,
            latency_ms = start.elapsed().as_millis() as u64,
            "Recognition service replied"
        );

        single_line(&body)
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn capture(&self, request: CaptureRequest) -> RecognitionResult<String> {
        let noise = if request.noise_violation { "true" } else { "false" };
        self.post_form(
            "capture",
            &[
                ("image", request.image.as_str()),
                ("username", request.username.as_str()),
                ("noise_violation", noise),
                ("reference", request.reference.as_str()),
            ],
        )
        .await
    }

    async fn validate(&self, request: ValidateRequest) -> RecognitionResult<String> {
        let mut form = vec![("image", request.image.as_str())];
        if let Some(username) = request.username.as_deref() {
            form.push(("username", username));
        }
        if let Some(reference) = request.reference.as_deref() {
            form.push(("reference", reference));
        }
        self.post_form("validate", &form).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Form, Router};
    use std::collections::HashMap;

    /// Start a stand-in recognition service on an ephemeral port
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_capture_sends_form_fields() {
        let router = Router::new().route(
            "/capture",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                if form.get("noise_violation").map(String::as_str) == Some("true")
                    && form.get("reference").map(String::as_str) == Some("refs/alice.png")
                {
                    "NOISE_VIOLATION\n".to_string()
                } else {
                    "OK".to_string()
                }
            }),
        );
        let base = spawn_stub(router).await;
        let client = HttpRecognitionClient::new(base, Duration::from_secs(5)).unwrap();

        let reply = client
            .capture(CaptureRequest {
                image: "data:image/png;base64,AAAA".to_string(),
                username: "alice".to_string(),
                noise_violation: true,
                reference: "refs/alice.png".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reply, "NOISE_VIOLATION");
    }

    #[tokio::test]
    async fn test_validate_omits_absent_username() {
        let router = Router::new().route(
            "/validate",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                if form.contains_key("username") {
                    "FACE_MATCH"
                } else {
                    "FACE_DETECTED"
                }
            }),
        );
        let base = spawn_stub(router).await;
        let client = HttpRecognitionClient::new(base, Duration::from_secs(5)).unwrap();

        let reply = client
            .validate(ValidateRequest {
                image: "data:image/png;base64,AAAA".to_string(),
                username: None,
                reference: None,
            })
            .await
            .unwrap();

        assert_eq!(reply, "FACE_DETECTED");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/capture",
            post(|| async { (StatusCode::BAD_REQUEST, "ERROR") }),
        );
        let base = spawn_stub(router).await;
        let client = HttpRecognitionClient::new(base, Duration::from_secs(5)).unwrap();

        let result = client
            .capture(CaptureRequest {
                image: String::new(),
                username: "alice".to_string(),
                noise_violation: false,
                reference: "ref".to_string(),
            })
            .await;

        assert!(matches!(result, Err(RecognitionError::Status(400))));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let router = Router::new().route(
            "/capture",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "OK"
            }),
        );
        let base = spawn_stub(router).await;
        let client = HttpRecognitionClient::new(base, Duration::from_millis(100)).unwrap();

        let result = client
            .capture(CaptureRequest {
                image: String::new(),
                username: "alice".to_string(),
                noise_violation: false,
                reference: "ref".to_string(),
            })
            .await;

        assert!(matches!(result, Err(RecognitionError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = format!("http://{}/", addr);
        let client = HttpRecognitionClient::new(base, Duration::from_secs(2)).unwrap();
        assert_eq!(client.base_url(), format!("http://{}", addr));

        let result = client
            .validate(ValidateRequest {
                image: String::new(),
                username: None,
                reference: None,
            })
            .await;

        assert!(matches!(result, Err(RecognitionError::Request(_))));
    }
}
