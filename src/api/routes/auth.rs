use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiError;
use crate::api::state::AppState;
use crate::auth::{hash_password, verify_password};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default, alias = "tagLine")]
    pub tag_line: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError> {
    let Json(req) = payload?;

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let tag_line = req.tag_line.as_deref().filter(|t| !t.is_empty());
    let password_hash = hash_password(&req.password);

    let user = state
        .db
        .create_user(&req.username, &password_hash, tag_line)
        .await?;

    info!(user_id = user.id, username = %user.username, "👤 New user signed up");

    Ok(Json(SignupResponse {
        id: user.id,
        username: user.username,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;

    let user = state
        .db
        .get_user_by_username(&req.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(user.id, &user.username)?;

    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}
