//! Leaderboard metrics over each user's most recent stored matches.

use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

use crate::db::{MatchRecord, Repository, User};
use crate::error::AppError;

/// Matches per user that feed the leaderboard.
pub const LEADERBOARD_WINDOW: i64 = 5;

/// Length of each list for the all-users scope.
pub const GLOBAL_TOP_N: usize = 3;

/// Group name that selects every user.
pub const ALL_GROUPS: &str = "*all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardScope {
    All,
    Group(String),
}

impl LeaderboardScope {
    /// A missing, blank or `*all` group name ranks every user. All three forms
    /// are cut to [`GLOBAL_TOP_N`], a missing name included.
    pub fn from_query(group_name: Option<&str>) -> Self {
        match group_name.map(str::trim) {
            None | Some("") | Some(ALL_GROUPS) => Self::All,
            Some(name) => Self::Group(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    /// Rounded to 2 decimals.
    pub kda: f64,
    /// Integer percent.
    pub win_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    #[serde(rename = "topKDA")]
    pub top_kda: Vec<LeaderboardEntry>,
    #[serde(rename = "topWinRate")]
    pub top_win_rate: Vec<LeaderboardEntry>,
}

/// `None` for a user with no matches.
pub fn compute_entry(username: &str, matches: &[MatchRecord]) -> Option<LeaderboardEntry> {
    if matches.is_empty() {
        return None;
    }

    let (kills, deaths, assists, wins) =
        matches.iter().fold((0i64, 0i64, 0i64, 0u32), |(k, d, a, w), m| {
            (
                k + i64::from(m.kills),
                d + i64::from(m.deaths),
                a + i64::from(m.assists),
                w + u32::from(m.win),
            )
        });

    let kda = (kills + assists) as f64 / deaths.max(1) as f64;
    let win_rate = (f64::from(wins) / matches.len() as f64 * 100.0).round() as u32;

    Some(LeaderboardEntry {
        username: username.to_string(),
        kda: (kda * 100.0).round() / 100.0,
        win_rate,
    })
}

/// Builds both descending rankings. Equal values are ordered by username.
pub fn rank(mut entries: Vec<LeaderboardEntry>, limit: Option<usize>) -> Leaderboard {
    entries.sort_by(|a, b| a.username.cmp(&b.username));

    let mut top_kda = entries.clone();
    top_kda.sort_by(|a, b| b.kda.total_cmp(&a.kda));

    let mut top_win_rate = entries;
    top_win_rate.sort_by(|a, b| b.win_rate.cmp(&a.win_rate));

    if let Some(limit) = limit {
        top_kda.truncate(limit);
        top_win_rate.truncate(limit);
    }

    Leaderboard {
        top_kda,
        top_win_rate,
    }
}

pub async fn leaderboard(db: &Repository, scope: &LeaderboardScope) -> Result<Leaderboard, AppError> {
    let (users, limit) = match scope {
        LeaderboardScope::All => (db.get_all_users().await?, Some(GLOBAL_TOP_N)),
        LeaderboardScope::Group(name) => {
            let group = db
                .get_group_by_name(name)
                .await?
                .ok_or_else(|| AppError::GroupNotFound(name.clone()))?;
            (db.get_group_users(group.id).await?, None)
        }
    };

    let entries = try_join_all(users.iter().map(|user| user_entry(db, user)))
        .await?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    debug!(?scope, users = users.len(), ranked = entries.len(), "🏆 Leaderboard computed");

    Ok(rank(entries, limit))
}

async fn user_entry(db: &Repository, user: &User) -> Result<Option<LeaderboardEntry>, AppError> {
    let matches = db.get_recent_matches(user.id, LEADERBOARD_WINDOW).await?;
    Ok(compute_entry(&user.username, &matches))
}
