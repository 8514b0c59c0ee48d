use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub tag_line: Option<String>,
    /// Calendar day of the last completed match sync.
    pub last_updated: Option<NaiveDate>,
}

impl User {
    pub fn synced_on(&self, day: NaiveDate) -> bool {
        self.last_updated == Some(day)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Member {
    pub id: i64,
    pub username: String,
}

/// A stored match, as seen by one user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchRecord {
    pub id: i64,
    pub match_id: String,
    pub user_id: i64,
    pub champion: String,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub win: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub match_id: String,
    pub user_id: i64,
    pub champion: String,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub win: bool,
    pub timestamp: DateTime<Utc>,
}
