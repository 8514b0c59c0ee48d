//! Pulls a user's recent matches from Riot into the store, at most once per day.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{Span, debug, field, info, instrument, warn};

use crate::db::{NewMatch, Repository, User};
use crate::error::AppError;
use crate::riot::LolApi;
use crate::riot::types::RiotApiError;

/// How many of the latest Riot match IDs a sync looks at.
pub const RECENT_MATCH_COUNT: u32 = 5;

/// Retention cap of stored matches per user.
pub const MAX_STORED_MATCHES: i64 = 20;

#[derive(Debug, thiserror::Error)]
enum SyncError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Riot(#[from] RiotApiError),
    #[error("Player {puuid} not found in match {match_id}")]
    PlayerNotFoundInMatch { puuid: String, match_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Skipped when the user was already synced today.
    Daily,
    /// Always runs and refetches every recent match, relying on insert-or-ignore.
    Forced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub new_matches_added: u32,
    pub message: String,
    /// `true` when the daily gate short-circuited the sync.
    pub skipped: bool,
}

impl SyncReport {
    fn already_synced() -> Self {
        Self {
            new_matches_added: 0,
            message: "Already updated today, skipping sync".to_string(),
            skipped: true,
        }
    }

    fn completed(mode: SyncMode, new_matches_added: u32) -> Self {
        let message = match mode {
            SyncMode::Daily => format!("Successfully synced {new_matches_added} new matches"),
            SyncMode::Forced => {
                format!("Force sync completed: {new_matches_added} new matches added")
            }
        };

        Self {
            new_matches_added,
            message,
            skipped: false,
        }
    }
}

pub struct MatchSyncer {
    api: Arc<dyn LolApi>,
    db: Repository,
    default_tag_line: String,
}

impl MatchSyncer {
    pub fn new(api: Arc<dyn LolApi>, db: Repository, default_tag_line: String) -> Self {
        Self {
            api,
            db,
            default_tag_line,
        }
    }

    pub async fn sync(&self, username: &str, mode: SyncMode) -> Result<SyncReport, AppError> {
        self.sync_on(username, mode, Local::now().date_naive()).await
    }

    /// Sync as if `today` were the current calendar day.
    ///
    /// Two concurrent daily syncs of the same user may both pass the gate; the
    /// unique `(match_id, user_id)` constraint keeps the outcome identical.
    #[instrument(skip(self), fields(user_id = field::Empty, puuid = field::Empty))]
    pub async fn sync_on(
        &self,
        username: &str,
        mode: SyncMode,
        today: NaiveDate,
    ) -> Result<SyncReport, AppError> {
        let user = self
            .db
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        Span::current().record("user_id", user.id);

        if mode == SyncMode::Daily && user.synced_on(today) {
            debug!("🔄 Already synced today, skipping");
            return Ok(SyncReport::already_synced());
        }

        let tag_line = user
            .tag_line
            .as_deref()
            .unwrap_or(&self.default_tag_line);

        let account = self
            .api
            .get_account_by_riot_id(&user.username, tag_line)
            .await
            .map_err(|e| match e {
                RiotApiError::NotFound => AppError::PlayerNotFound {
                    game_name: user.username.clone(),
                    tag_line: tag_line.to_string(),
                },
                other => other.into(),
            })?;

        Span::current().record("puuid", account.puuid.as_str());

        let match_ids = self
            .api
            .get_match_ids(&account.puuid, RECENT_MATCH_COUNT)
            .await?;

        let known: HashSet<String> = match mode {
            SyncMode::Daily => self
                .db
                .get_match_ids_for_user(user.id)
                .await?
                .into_iter()
                .collect(),
            SyncMode::Forced => HashSet::new(),
        };

        let mut new_matches_added = 0;

        for match_id in match_ids.iter().filter(|id| !known.contains(*id)) {
            match self.store_match(&user, &account.puuid, match_id).await {
                Ok(true) => new_matches_added += 1,
                Ok(false) => debug!(%match_id, "🔄 Match already stored"),
                Err(e) => warn!(error = %e, %match_id, "🔄 ⚠️ Skipping match"),
            }
        }

        let pruned = self.db.prune_matches(user.id, MAX_STORED_MATCHES).await?;
        self.db.set_last_updated(user.id, today).await?;

        info!(
            ?mode,
            fetched = match_ids.len(),
            new_matches_added,
            pruned,
            "🔄 ✅ Match sync completed"
        );

        Ok(SyncReport::completed(mode, new_matches_added))
    }

    /// Returns `true` when the match was newly written.
    async fn store_match(&self, user: &User, puuid: &str, match_id: &str) -> Result<bool, SyncError> {
        let match_data = self.api.get_match(match_id).await?;

        let participant =
            match_data
                .participant_info_of(puuid)
                .ok_or_else(|| SyncError::PlayerNotFoundInMatch {
                    puuid: puuid.to_string(),
                    match_id: match_id.to_string(),
                })?;

        let new_match = NewMatch {
            match_id: match_id.to_string(),
            user_id: user.id,
            champion: participant.champion_name.clone(),
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            win: participant.win,
            timestamp: match_data.info.ended_at(),
        };

        Ok(self.db.insert_match(&new_match).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_repository;
    use crate::riot::testing::{FakeRiot, match_with, participant};
    use reqwest::StatusCode;

    const PUUID: &str = "puuid-alice";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    async fn setup(riot: FakeRiot) -> (Arc<FakeRiot>, Repository, MatchSyncer) {
        let db = test_repository().await;
        db.create_user("alice", "hash", None).await.unwrap();
        let riot = Arc::new(riot.with_account("alice", "NA1", PUUID));
        let syncer = MatchSyncer::new(riot.clone(), db.clone(), "NA1".to_string());
        (riot, db, syncer)
    }

    fn seed_matches(riot: &FakeRiot, ids: &[&str], start_secs: i64) {
        for (i, id) in ids.iter().enumerate() {
            riot.add_match(
                id,
                match_with(vec![participant(PUUID, 2, 1, 3, i % 2 == 0)], start_secs + i as i64),
            );
        }
    }

    async fn stored_ids(db: &Repository) -> Vec<String> {
        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        let mut ids = db.get_match_ids_for_user(user.id).await.unwrap();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn daily_sync_stores_new_matches_and_marks_day() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        let ids = ["NA1_5", "NA1_4", "NA1_3", "NA1_2", "NA1_1"];
        seed_matches(&riot, &ids, 1_000);
        riot.set_recent(&ids);

        let report = syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();

        assert_eq!(report.new_matches_added, 5);
        assert_eq!(report.message, "Successfully synced 5 new matches");
        assert!(!report.skipped);
        assert_eq!(stored_ids(&db).await.len(), 5);
        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert!(user.synced_on(today()));
    }

    #[tokio::test]
    async fn second_daily_sync_same_day_makes_no_api_calls() {
        let (riot, _db, syncer) = setup(FakeRiot::new()).await;
        seed_matches(&riot, &["NA1_1"], 1_000);
        riot.set_recent(&["NA1_1"]);

        syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();
        let calls = riot.calls();

        let report = syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();

        assert!(report.skipped);
        assert_eq!(report.new_matches_added, 0);
        assert_eq!(report.message, "Already updated today, skipping sync");
        assert_eq!(riot.calls(), calls);
    }

    #[tokio::test]
    async fn next_day_sync_only_fetches_unknown_matches() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        seed_matches(&riot, &["NA1_1", "NA1_2", "NA1_3"], 1_000);
        riot.set_recent(&["NA1_2", "NA1_1"]);
        syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();
        let details_before = riot.detail_calls();

        riot.set_recent(&["NA1_3", "NA1_2", "NA1_1"]);
        let tomorrow = today().succ_opt().unwrap();
        let report = syncer.sync_on("alice", SyncMode::Daily, tomorrow).await.unwrap();

        assert_eq!(report.new_matches_added, 1);
        assert_eq!(riot.detail_calls() - details_before, 1);
        assert_eq!(stored_ids(&db).await, vec!["NA1_1", "NA1_2", "NA1_3"]);
    }

    #[tokio::test]
    async fn forced_sync_refetches_and_ignores_duplicates() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        seed_matches(&riot, &["NA1_1", "NA1_2"], 1_000);
        riot.set_recent(&["NA1_2", "NA1_1"]);
        syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();
        let details_before = riot.detail_calls();

        let report = syncer.sync_on("alice", SyncMode::Forced, today()).await.unwrap();

        assert!(!report.skipped);
        assert_eq!(report.new_matches_added, 0);
        assert_eq!(report.message, "Force sync completed: 0 new matches added");
        assert_eq!(riot.detail_calls() - details_before, 2);
        assert_eq!(stored_ids(&db).await, vec!["NA1_1", "NA1_2"]);
    }

    #[tokio::test]
    async fn stored_history_is_capped() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        let all: Vec<String> = (0..30).map(|i| format!("NA1_{i:02}")).collect();
        let all_refs: Vec<&str> = all.iter().map(String::as_str).collect();
        seed_matches(&riot, &all_refs, 10_000);

        let mut day = today();
        // Five new matches per day, newest first.
        for chunk in all_refs.chunks(5) {
            let mut recent = chunk.to_vec();
            recent.reverse();
            riot.set_recent(&recent);
            syncer.sync_on("alice", SyncMode::Daily, day).await.unwrap();
            day = day.succ_opt().unwrap();
        }

        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        let kept = db.get_recent_matches(user.id, 100).await.unwrap();
        assert_eq!(kept.len(), MAX_STORED_MATCHES as usize);
        assert_eq!(kept.first().unwrap().match_id, "NA1_29");
        assert_eq!(kept.last().unwrap().match_id, "NA1_10");
    }

    #[tokio::test]
    async fn missing_participant_and_failed_detail_are_skipped() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        seed_matches(&riot, &["NA1_1"], 1_000);
        riot.add_match(
            "NA1_2",
            match_with(vec![participant("someone-else", 1, 1, 1, true)], 2_000),
        );
        // NA1_3 has no details at all.
        riot.set_recent(&["NA1_3", "NA1_2", "NA1_1"]);

        let report = syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();

        assert_eq!(report.new_matches_added, 1);
        assert_eq!(stored_ids(&db).await, vec!["NA1_1"]);
        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert!(user.synced_on(today()));
    }

    #[tokio::test]
    async fn sync_with_no_new_matches_still_marks_day() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        riot.set_recent(&[]);

        let report = syncer.sync_on("alice", SyncMode::Daily, today()).await.unwrap();

        assert_eq!(report.new_matches_added, 0);
        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert!(user.synced_on(today()));
    }

    #[tokio::test]
    async fn unknown_riot_account_aborts_sync() {
        let db = test_repository().await;
        db.create_user("ghost", "hash", Some("EUW")).await.unwrap();
        let riot = Arc::new(FakeRiot::new());
        let syncer = MatchSyncer::new(riot.clone(), db.clone(), "NA1".to_string());

        let err = syncer
            .sync_on("ghost", SyncMode::Daily, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::PlayerNotFound { ref game_name, ref tag_line }
                if game_name == "ghost" && tag_line == "EUW"
        ));
        let user = db.get_user_by_username("ghost").await.unwrap().unwrap();
        assert!(user.last_updated.is_none());
    }

    #[tokio::test]
    async fn unknown_user_is_reported() {
        let (riot, _db, syncer) = setup(FakeRiot::new()).await;

        let err = syncer
            .sync_on("nobody", SyncMode::Forced, today())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(name) if name == "nobody"));

        let err = syncer
            .sync_on("nobody", SyncMode::Daily, today())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UserNotFound(_)));
        assert_eq!(riot.calls(), 0);
    }

    #[tokio::test]
    async fn account_lookup_failure_aborts_without_marking_day() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let (riot, db, syncer) = setup(FakeRiot::new()).await;
            seed_matches(&riot, &["NA1_1"], 1_000);
            riot.set_recent(&["NA1_1"]);
            riot.fail_account_with(status);

            for mode in [SyncMode::Daily, SyncMode::Forced] {
                let err = syncer.sync_on("alice", mode, today()).await.unwrap_err();
                assert!(matches!(err, AppError::RiotApi(_)), "{status}: {err}");
            }

            assert_eq!(riot.detail_calls(), 0);
            assert!(stored_ids(&db).await.is_empty());
            let user = db.get_user_by_username("alice").await.unwrap().unwrap();
            assert!(user.last_updated.is_none());
        }
    }

    #[tokio::test]
    async fn match_id_listing_failure_aborts_without_marking_day() {
        let (riot, db, syncer) = setup(FakeRiot::new()).await;
        riot.fail_match_ids_with(StatusCode::INTERNAL_SERVER_ERROR);

        let err = syncer
            .sync_on("alice", SyncMode::Daily, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::RiotApi(RiotApiError::Status(s)) if s == StatusCode::INTERNAL_SERVER_ERROR
        ));
        assert_eq!(riot.detail_calls(), 0);
        let user = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert!(user.last_updated.is_none());
    }
}
