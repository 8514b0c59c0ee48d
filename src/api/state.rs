use std::sync::Arc;

use crate::auth::TokenSigner;
use crate::db::Repository;
use crate::sync::MatchSyncer;

#[derive(Clone)]
pub struct AppState {
    pub db: Repository,
    pub syncer: Arc<MatchSyncer>,
    pub tokens: Arc<TokenSigner>,
}
