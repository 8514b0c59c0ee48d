use async_trait::async_trait;

use super::types::{AccountDto, MatchDto, RiotApiResponse};

/// Riot Account-V1 API.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountDto>;
}

/// Riot Match-V5 API.
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// Most recent match IDs of a player, newest first.
    async fn get_match_ids(&self, puuid: &str, count: u32) -> RiotApiResponse<Vec<String>>;

    async fn get_match(&self, match_id: &str) -> RiotApiResponse<MatchDto>;
}

/// Every Riot API the match sync needs.
pub trait LolApi: AccountApi + MatchApi {}
