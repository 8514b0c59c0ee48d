use thiserror::Error;

use crate::riot::types::RiotApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Riot API error: {0}")]
    RiotApi(#[from] RiotApiError),

    #[error("Summoner not found: {game_name}#{tag_line}")]
    PlayerNotFound { game_name: String, tag_line: String },

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("User is already a member of {0}")]
    AlreadyMember(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session token error: {0}")]
    Token(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
