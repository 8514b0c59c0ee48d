use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::api::ApiError;
use crate::api::state::AppState;
use crate::stats::{self, Leaderboard, LeaderboardScope};

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(rename = "groupName")]
    pub group_name: Option<String>,
}

/// `groupName` absent or `*all` ranks everyone; otherwise only that group.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Leaderboard>, ApiError> {
    let scope = LeaderboardScope::from_query(query.group_name.as_deref());

    let board = stats::leaderboard(&state.db, &scope)
        .await
        .map_err(|e| ApiError::with_fallback(e, "Failed to get leaderboard"))?;

    Ok(Json(board))
}
