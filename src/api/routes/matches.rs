use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::api::ApiError;
use crate::api::state::AppState;
use crate::db::MatchRecord;
use crate::error::AppError;
use crate::sync::{MAX_STORED_MATCHES, SyncMode, SyncReport};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub new_matches_added: u32,
    pub message: String,
}

impl From<SyncReport> for SyncResponse {
    fn from(report: SyncReport) -> Self {
        Self {
            success: true,
            new_matches_added: report.new_matches_added,
            message: report.message,
        }
    }
}

pub async fn sync(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<SyncResponse>, ApiError> {
    let report = state
        .syncer
        .sync(&username, SyncMode::Daily)
        .await
        .map_err(|e| ApiError::with_fallback(e, "Failed to sync matches"))?;

    Ok(Json(report.into()))
}

pub async fn force_sync(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<SyncResponse>, ApiError> {
    let report = state
        .syncer
        .sync(&username, SyncMode::Forced)
        .await
        .map_err(|e| ApiError::with_fallback(e, "Failed to force sync matches"))?;

    Ok(Json(report.into()))
}

/// Stored matches of a user, newest first.
pub async fn recent(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<MatchRecord>>, ApiError> {
    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::UserNotFound(username.clone()))?;

    let matches = state
        .db
        .get_recent_matches(user.id, MAX_STORED_MATCHES)
        .await?;

    Ok(Json(matches))
}
