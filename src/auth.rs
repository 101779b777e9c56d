//! HTTP Basic Authentication for the admin routes

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::config::non_empty_var;

/// Admin credentials. Without them the admin routes are open.
#[derive(Debug, Clone, Default)]
pub struct AdminAuth {
    credentials: Option<(String, String)>,
}

impl AdminAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Some((username.into(), password.into())),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Reads ADMIN_USERNAME and ADMIN_PASSWORD; a half-configured pair leaves auth off
    pub fn from_env() -> Self {
        match (non_empty_var("ADMIN_USERNAME"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => {
                tracing::info!(username = %username, "Admin routes require Basic auth");
                Self::new(username, password)
            }
            (username, password) => {
                if username.is_some() || password.is_some() {
                    tracing::warn!(
                        "Ignoring admin credentials: set both ADMIN_USERNAME and ADMIN_PASSWORD"
                    );
                }
                tracing::warn!("Admin routes are unauthenticated");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn validate(&self, username: &str, password: &str) -> bool {
        let Some((expected_user, expected_pass)) = &self.credentials else {
            return true;
        };
        // Both comparisons always run
        let user_ok = bytes_match(expected_user.as_bytes(), username.as_bytes());
        let pass_ok = bytes_match(expected_pass.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }

    /// Check an `Authorization: Basic ...` header value
    fn accepts_header(&self, value: &str) -> bool {
        value
            .strip_prefix("Basic ")
            .and_then(|encoded| STANDARD.decode(encoded.trim()).ok())
            .and_then(|decoded| String::from_utf8(decoded).ok())
            .and_then(|decoded| {
                let (username, password) = decoded.split_once(':')?;
                Some(self.validate(username, password))
            })
            .unwrap_or(false)
    }
}

/// Equality that inspects every byte of equal-length inputs
fn bytes_match(expected: &[u8], given: &[u8]) -> bool {
    expected.len() == given.len()
        && expected
            .iter()
            .zip(given)
            .fold(0u8, |diff, (x, y)| diff | (x ^ y))
            == 0
}

/// Middleware guarding `/api/admin/*`
pub async fn admin_auth_middleware(
    State(auth): State<Arc<AdminAuth>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if !auth.is_enabled() {
        return next.run(request).await;
    }

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|value| auth.accepts_header(value));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(uri = %request.uri(), "Rejected unauthenticated admin request");
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Proctor Admin\"")],
        "Unauthorized",
    )
        .into_response()
}
