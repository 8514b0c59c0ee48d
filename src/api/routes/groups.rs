use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::api::state::AppState;
use crate::db::Member;
use crate::error::AppError;
use crate::stats::ALL_GROUPS;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroupRequest {
    pub username: String,
    pub group_name: String,
}

#[derive(Debug, Serialize)]
pub struct JoinGroupResponse {
    pub success: bool,
    pub message: String,
}

/// Adds the user to the group, creating the group on first join.
pub async fn join(
    State(state): State<AppState>,
    payload: Result<Json<JoinGroupRequest>, JsonRejection>,
) -> Result<Json<JoinGroupResponse>, ApiError> {
    let Json(req) = payload?;

    let group_name = req.group_name.trim();
    if group_name.is_empty() {
        return Err(ApiError::BadRequest("groupName is required".into()));
    }
    if group_name == ALL_GROUPS {
        return Err(ApiError::BadRequest(format!(
            "Group name {ALL_GROUPS} is reserved"
        )));
    }

    let joined = async {
        let user = state
            .db
            .get_user_by_username(&req.username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(req.username.clone()))?;

        let group = state.db.get_or_create_group(group_name).await?;

        if !state.db.add_group_member(group.id, user.id).await? {
            return Err(AppError::AlreadyMember(group.name));
        }

        info!(user_id = user.id, group_id = group.id, group = %group.name, "👥 User joined group");
        Ok::<_, AppError>(group.name)
    }
    .await
    .map_err(|e| ApiError::with_fallback(e, "Failed to join group"))?;

    Ok(Json(JoinGroupResponse {
        success: true,
        message: format!("Joined group {joined}"),
    }))
}

pub async fn members(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = async {
        let group = state
            .db
            .get_group_by_name(&group_name)
            .await?
            .ok_or_else(|| AppError::GroupNotFound(group_name.clone()))?;

        state.db.get_group_members(group.id).await
    }
    .await
    .map_err(|e| ApiError::with_fallback(e, "Failed to fetch group data"))?;

    Ok(Json(members))
}
