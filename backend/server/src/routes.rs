use std::sync::Arc;

use axum::{
    Json,
    extract::{self, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    error::AppError,
    feedback::FeedbackRecord,
    state::State,
    stats::{FeedbackStats, collect_stats},
    utils::{FeedbackSubmission, LoginRequest},
};

pub const BANNER: &str = "Welcome to the Feedback System API! Available endpoints: /api/submit-feedback, /api/admin/login, /api/admin/stats";

fn payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(inner)| inner).map_err(|e| {
        warn!("Rejected payload: {e}");
        AppError::MalformedPayload
    })
}

pub async fn home_handler() -> &'static str {
    BANNER
}

pub async fn submit_feedback_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let submission = payload(body)?;

    let valid = submission.validate().map_err(|e| {
        warn!("Invalid feedback submission: {e:?}");
        e
    })?;

    let sentiment = state.scorer.polarity_scores(&valid.feedback);
    let record = FeedbackRecord::new(valid.feedback, valid.event, valid.emoji, sentiment);

    let id = state
        .store
        .insert(&record)
        .await
        .map_err(|e| AppError::internal("Failed to submit feedback", e))?;

    info!(
        "Feedback {id} saved: event={}, emoji={}, compound={}, category={}",
        record.event, record.emoji, record.sentiment.compound, record.category
    );

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Feedback submitted successfully", "id": id })),
    ))
}

pub async fn admin_login_handler(
    extract::State(state): extract::State<Arc<State>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let login = payload(body)?;

    let (Some(email), Some(password)) = (login.email, login.password) else {
        warn!("Admin login missing email or password");
        return Err(AppError::InvalidCredentials);
    };

    if !state.config.admin.verify(email, password).await {
        warn!("Admin login rejected");
        return Err(AppError::InvalidCredentials);
    }

    info!("Admin login accepted");

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Login successful" })),
    ))
}

pub async fn stats_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<FeedbackStats>, AppError> {
    let stats = collect_stats(state.store.as_ref())
        .await
        .map_err(|e| AppError::internal("Failed to fetch statistics", e))?;

    info!(
        "Stats: total={}, sentiment={:?}, emoji={:?}, listed={}",
        stats.total_feedbacks,
        stats.sentiment_stats,
        stats.emoji_stats,
        stats.feedbacks.len()
    );

    Ok(Json(stats))
}
