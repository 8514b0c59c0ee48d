use std::sync::Arc;

use riftboard::{
    api::{build_router, state::AppState},
    auth::TokenSigner,
    config::Config,
    db::{self, Repository},
    error::AppError,
    logging::{self, LogSettings},
    riot::RiotClient,
    sync::MatchSyncer,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    logging::init(&LogSettings::from_env())?;

    info!("🐙 Starting...");

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let repository = Repository::new(pool);

    let riot = Arc::new(RiotClient::new(
        config.riot_api_key.clone(),
        config.riot_region,
        config.riot_rate_limit_per_second,
    ));
    tokio::spawn(riot.metrics().log_loop());

    let state = AppState {
        db: repository.clone(),
        syncer: Arc::new(MatchSyncer::new(
            riot,
            repository,
            config.default_tag_line.clone(),
        )),
        tokens: Arc::new(TokenSigner::new(&config.jwt_secret)?),
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, region = %config.riot_region, "🌐 Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
