use async_trait::async_trait;

use crate::riot::client::RiotClient;
use crate::riot::traits::MatchApi;
use crate::riot::types::{MatchDto, RiotApiResponse};

#[async_trait]
impl MatchApi for RiotClient {
    async fn get_match_ids(&self, puuid: &str, count: u32) -> RiotApiResponse<Vec<String>> {
        let path = format!(
            "/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            puuid, count
        );

        self.get(&path).await
    }

    async fn get_match(&self, match_id: &str) -> RiotApiResponse<MatchDto> {
        let path = format!("/lol/match/v5/matches/{}", match_id);

        self.get(&path).await
    }
}
