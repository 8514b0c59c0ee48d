use async_trait::async_trait;

use crate::riot::client::RiotClient;
use crate::riot::traits::AccountApi;
use crate::riot::types::{AccountDto, RiotApiResponse};

#[async_trait]
impl AccountApi for RiotClient {
    /// Get account by Riot ID (game name + tag line)
    /// Uses regional routing (americas, europe, asia, sea)
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> RiotApiResponse<AccountDto> {
        let path = format!(
            "/riot/account/v1/accounts/by-riot-id/{}/{}",
            urlencoding::encode(game_name),
            urlencoding::encode(tag_line)
        );

        self.get(&path).await
    }
}
