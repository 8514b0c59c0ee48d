use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::models::{Group, MatchRecord, Member, NewMatch, User};
use crate::error::AppError;

const USER_COLUMN_NAMES: [&str; 5] = ["id", "username", "password_hash", "tag_line", "last_updated"];

const MATCH_COLUMNS: &str =
    "id, match_id, user_id, champion, kills, deaths, assists, win, timestamp";

fn user_columns(alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
    USER_COLUMN_NAMES
        .iter()
        .map(|col| format!("{prefix}{col}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[derive(Clone, Debug)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // === User operations ===

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        tag_line: Option<&str>,
    ) -> Result<User, AppError> {
        let columns = user_columns(None);
        let query = format!(
            "INSERT INTO users (username, password_hash, tag_line) VALUES (?, ?, ?) RETURNING {columns}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(password_hash)
            .bind(tag_line)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::UsernameTaken(username.to_string())
                } else {
                    e.into()
                }
            })
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let columns = user_columns(None);
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {columns} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, AppError> {
        let columns = user_columns(None);
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {columns} FROM users ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn set_last_updated(&self, user_id: i64, day: NaiveDate) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_updated = ? WHERE id = ?")
            .bind(day)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // === Group operations ===

    pub async fn get_group_by_name(&self, name: &str) -> Result<Option<Group>, AppError> {
        let group = sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(group)
    }

    pub async fn get_or_create_group(&self, name: &str) -> Result<Group, AppError> {
        if let Some(group) = self.get_group_by_name(name).await? {
            return Ok(group);
        }

        sqlx::query("INSERT INTO groups (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;

        self.get_group_by_name(name)
            .await?
            .ok_or_else(|| AppError::Database(sqlx::Error::RowNotFound))
    }

    // === Group membership ===

    /// Returns `false` when the user was already a member.
    pub async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO group_members (group_id, user_id) VALUES (?, ?)")
                .bind(group_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_group_members(&self, group_id: i64) -> Result<Vec<Member>, AppError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT u.id, u.username
            FROM group_members gm
            INNER JOIN users u ON gm.user_id = u.id
            WHERE gm.group_id = ?
            ORDER BY u.id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    pub async fn get_group_users(&self, group_id: i64) -> Result<Vec<User>, AppError> {
        let columns = user_columns(Some("u"));
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {columns}
            FROM users u
            INNER JOIN group_members gm ON u.id = gm.user_id
            WHERE gm.group_id = ?
            ORDER BY u.id ASC
            "#
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // === Match operations ===

    pub async fn get_match_ids_for_user(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let ids = sqlx::query_scalar::<_, String>("SELECT match_id FROM matches WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Insert-or-ignore on `(match_id, user_id)`. Returns `true` when a row was written.
    pub async fn insert_match(&self, new_match: &NewMatch) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO matches
                (match_id, user_id, champion, kills, deaths, assists, win, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(match_id, user_id) DO NOTHING
            "#,
        )
        .bind(&new_match.match_id)
        .bind(new_match.user_id)
        .bind(&new_match.champion)
        .bind(new_match.kills)
        .bind(new_match.deaths)
        .bind(new_match.assists)
        .bind(new_match.win)
        .bind(new_match.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every match of the user beyond the `keep` most recent. Returns the deleted count.
    pub async fn prune_matches(&self, user_id: i64, keep: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM matches
            WHERE user_id = ?
            AND id NOT IN (
                SELECT id FROM matches
                WHERE user_id = ?
                ORDER BY timestamp DESC
                LIMIT ?
            )
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(keep)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn get_recent_matches(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let matches = sqlx::query_as::<_, MatchRecord>(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE user_id = ? ORDER BY timestamp DESC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(matches)
    }
}
