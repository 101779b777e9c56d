//! HTTP API.
//!
//! Proctoring routes speak single-line text signals; everything else is JSON.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Form, Json, Router,
};
use std::sync::Arc;

use crate::auth::{admin_auth_middleware, AdminAuth};
use crate::error::ProctorError;
use crate::protocol::*;
use crate::state::{parse_answers, parse_options, parse_time_seconds, AppState};
use crate::types::*;

/// Build the application router
pub fn router(state: Arc<AppState>, admin_auth: Arc<AdminAuth>) -> Router {
    let admin_routes = Router::new()
        .route("/questions", get(list_questions).post(add_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/results", get(list_results))
        .route("/violations/{username}", get(violation_status))
        .route("/enrollments", post(enroll))
        .route("/enrollments/{username}", delete(deregister))
        .layer(middleware::from_fn_with_state(
            admin_auth,
            admin_auth_middleware,
        ));

    Router::new()
        .route("/api/capture", post(capture))
        .route("/api/validate-face", post(validate_face))
        .route("/api/session/start", post(start_session))
        .route("/api/questions/next", get(next_question))
        .route("/api/submit", post(submit))
        .route("/api/results/{username}", get(score))
        .route("/api/violations/fullscreen", post(fullscreen_violation))
        .route("/api/violations/tab-change", post(tab_change_violation))
        .route("/api/violations/window-change", post(window_change_violation))
        .nest("/api/admin", admin_routes)
        .with_state(state)
}

/// POST /api/capture
pub async fn capture(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CaptureForm>,
) -> Response {
    let noise_violation = match form.noise_flag() {
        Ok(flag) => flag,
        Err(e) => return e.into_text_response(),
    };
    match state.capture(&form.username, form.image, noise_violation).await {
        Ok(signal) => signal.to_string().into_response(),
        Err(e) => e.into_text_response(),
    }
}

/// POST /api/validate-face
pub async fn validate_face(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ValidateFaceForm>,
) -> Response {
    let username = form.username.as_deref().filter(|u| !u.trim().is_empty());
    match state.validate_face(form.image, username).await {
        Ok(check) => check.to_string().into_response(),
        Err(e) => e.into_text_response(),
    }
}

/// POST /api/session/start
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UsernameBody>,
) -> Json<SessionStartResponse> {
    Json(state.start_session(&body.username).await.into())
}

/// GET /api/questions/next?username=...
pub async fn next_question(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UsernameQuery>,
) -> Json<NextQuestionResponse> {
    Json(state.next_question(&query.username).await.into())
}

/// POST /api/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ProctorError> {
    let answers = parse_answers(body.answers)?;
    let result = state.submit_answers(&body.username, &answers).await;
    Ok(Json(SubmitResponse {
        success: true,
        score: result.score,
    }))
}

/// GET /api/results/{username}
pub async fn score(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Json<ScoreResponse> {
    let score = state.score_for(&username).await;
    Json(ScoreResponse { username, score })
}

async fn record(state: &AppState, username: &str, kind: ViolationKind) -> String {
    state.record_violation(username, kind).await.to_string()
}

/// POST /api/violations/fullscreen
pub async fn fullscreen_violation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UsernameBody>,
) -> String {
    record(&state, &body.username, ViolationKind::FullscreenExit).await
}

/// POST /api/violations/tab-change
pub async fn tab_change_violation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UsernameBody>,
) -> String {
    record(&state, &body.username, ViolationKind::TabChange).await
}

/// POST /api/violations/window-change
pub async fn window_change_violation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UsernameBody>,
) -> String {
    record(&state, &body.username, ViolationKind::WindowChange).await
}

// ========== Admin ==========

/// GET /api/admin/questions
pub async fn list_questions(State(state): State<Arc<AppState>>) -> Json<Vec<Question>> {
    Json(state.list_questions().await)
}

/// POST /api/admin/questions
pub async fn add_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddQuestionRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), ProctorError> {
    let time_seconds = parse_time_seconds(&body.time)?;
    let question = state
        .add_question(body.text, parse_options(&body.options), body.answer, time_seconds)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            success: true,
            message: format!("Question {} added", question.id),
            question: Some(question),
        }),
    ))
}

/// DELETE /api/admin/questions/{id}
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<QuestionId>,
) -> Result<Json<MutationResponse>, ProctorError> {
    let removed = state.delete_question(id).await?;
    Ok(Json(MutationResponse {
        success: true,
        message: format!("Question {} deleted", removed.id),
        question: None,
    }))
}

/// GET /api/admin/results
pub async fn list_results(State(state): State<Arc<AppState>>) -> Json<Vec<ExamResult>> {
    Json(state.list_results().await)
}

/// GET /api/admin/violations/{username}
pub async fn violation_status(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Json<ViolationStatus> {
    let record = state.violation_record(&username).await;
    let count = record.as_ref().map_or(0, |r| r.count);
    Json(ViolationStatus {
        username,
        count,
        terminated: count >= MAX_VIOLATIONS,
        last_kind: record.as_ref().map(|r| r.last_kind.clone()),
        updated_at: record.map(|r| r.updated_at),
    })
}

/// POST /api/admin/enrollments
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollResponse>), ProctorError> {
    let reference = state.enroll_reference(&body.username, body.reference).await?;
    Ok((
        StatusCode::CREATED,
        Json(EnrollResponse {
            success: true,
            message: format!("Reference face enrolled for {}", body.username),
            reference,
        }),
    ))
}

/// DELETE /api/admin/enrollments/{username}
pub async fn deregister(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<MutationResponse>, ProctorError> {
    state.deregister_reference(&username).await?;
    Ok(Json(MutationResponse {
        success: true,
        message: format!("Reference face removed for {}", username),
        question: None,
    }))
}
