//! In-memory Riot API used by sync and route tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::traits::{AccountApi, LolApi, MatchApi};
use super::types::{
    AccountDto, InfoDto, MatchDto, ParticipantDto, RiotApiError, RiotApiResponse,
};

#[derive(Debug, Default)]
pub struct FakeRiot {
    /// Riot IDs (`name#tag`) mapped to their puuid.
    accounts: HashMap<String, String>,
    match_ids: Mutex<Vec<String>>,
    matches: Mutex<HashMap<String, MatchDto>>,
    calls: AtomicUsize,
    detail_calls: AtomicUsize,
    account_failure: Mutex<Option<StatusCode>>,
    match_ids_failure: Mutex<Option<StatusCode>>,
}

impl FakeRiot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, game_name: &str, tag_line: &str, puuid: &str) -> Self {
        self.accounts
            .insert(format!("{game_name}#{tag_line}"), puuid.to_string());
        self
    }

    /// Replaces the recent match list, newest first.
    pub fn set_recent(&self, ids: &[&str]) {
        *self.match_ids.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
    }

    pub fn add_match(&self, match_id: &str, match_data: MatchDto) {
        self.matches
            .lock()
            .unwrap()
            .insert(match_id.to_string(), match_data);
    }

    /// Makes every account lookup answer with `status`.
    pub fn fail_account_with(&self, status: StatusCode) {
        *self.account_failure.lock().unwrap() = Some(status);
    }

    /// Makes every match-id listing answer with `status`.
    pub fn fail_match_ids_with(&self, status: StatusCode) {
        *self.match_ids_failure.lock().unwrap() = Some(status);
    }

    /// Every request made so far, of any kind.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountApi for FakeRiot {
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountDto> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.account_failure.lock().unwrap() {
            return Err(RiotApiError::from_status(status));
        }

        let puuid = self
            .accounts
            .get(&format!("{game_name}#{tag_line}"))
            .ok_or(RiotApiError::NotFound)?;

        Ok(AccountDto {
            puuid: puuid.clone(),
            game_name: Some(game_name.to_string()),
            tag_line: Some(tag_line.to_string()),
        })
    }
}

#[async_trait]
impl MatchApi for FakeRiot {
    async fn get_match_ids(&self, _puuid: &str, count: u32) -> RiotApiResponse<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.match_ids_failure.lock().unwrap() {
            return Err(RiotApiError::from_status(status));
        }

        let ids = self.match_ids.lock().unwrap();
        Ok(ids.iter().take(count as usize).cloned().collect())
    }

    async fn get_match(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.matches
            .lock()
            .unwrap()
            .get(match_id)
            .cloned()
            .ok_or(RiotApiError::NotFound)
    }
}

impl LolApi for FakeRiot {}

pub fn participant(puuid: &str, kills: i32, deaths: i32, assists: i32, win: bool) -> ParticipantDto {
    ParticipantDto {
        puuid: puuid.to_string(),
        champion_name: "Lux".to_string(),
        kills,
        deaths,
        assists,
        win,
    }
}

/// A match ending `end_secs` seconds after the epoch.
pub fn match_with(participants: Vec<ParticipantDto>, end_secs: i64) -> MatchDto {
    MatchDto {
        info: InfoDto {
            participants,
            game_creation: (end_secs - 1800) * 1000,
            game_end_timestamp: Some(end_secs * 1000),
        },
    }
}
