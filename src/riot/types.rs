use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type RiotApiResponse<T> = Result<T, RiotApiError>;

/// Failures of a Riot API call, classified by HTTP status.
#[derive(Debug, Error)]
pub enum RiotApiError {
    #[error("invalid API key")]
    Unauthorized,

    #[error("forbidden, the API key may not have the required permissions")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("request failed with status {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl RiotApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            other => Self::Status(other),
        }
    }
}

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// Match-v5
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub info: InfoDto,
}

impl MatchDto {
    pub fn participant_info_of(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub participants: Vec<ParticipantDto>,
    pub game_creation: i64,
    /// Missing on matches played before patch 11.20.
    pub game_end_timestamp: Option<i64>,
}

impl InfoDto {
    /// When the game ended, falling back to its creation time.
    pub fn ended_at(&self) -> DateTime<Utc> {
        let millis = self.game_end_timestamp.unwrap_or(self.game_creation);
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_name: String,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub win: bool,
}
