//! HTTP API.
//!
//! Axum router over auth, match sync, leaderboard and group membership.
//! Every failure is answered with a `{"error": "..."}` body.

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::error::AppError;

pub mod routes;
pub mod state;

use routes::{auth, groups, leaderboard, matches};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    /// Holds the message shown to the client, never the underlying cause.
    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// Maps a domain error, hiding unexpected failures behind `fallback`.
    pub fn with_fallback(err: AppError, fallback: &str) -> Self {
        match err {
            AppError::UserNotFound(_) => Self::NotFound("User not found".into()),
            AppError::GroupNotFound(_) => Self::NotFound("Group not found".into()),
            AppError::PlayerNotFound { .. } => Self::NotFound(err.to_string()),
            AppError::UsernameTaken(_) => Self::BadRequest("Username already exists".into()),
            AppError::AlreadyMember(group) => {
                Self::Conflict(format!("You are already a member of {group}"))
            }
            AppError::InvalidCredentials => Self::Unauthorized("Invalid credentials".into()),
            other => {
                error!(error = %other, "🌐 ❌ Request failed");
                Self::Internal(fallback.to_string())
            }
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::with_fallback(err, "Server error")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/api/matches/sync/:username", post(matches::sync))
        .route("/api/matches/force-sync/:username", post(matches::force_sync))
        .route("/api/matches/:username/recent", get(matches::recent))
        .route("/api/leaderboard", get(leaderboard::leaderboard))
        .route("/api/groups/join", post(groups::join))
        .route("/api/groups/:group_name", get(groups::members))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
