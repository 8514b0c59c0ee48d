use std::env;
use std::num::NonZeroU32;

use crate::error::AppError;
use crate::riot::Region;

#[derive(Debug, Clone)]
pub struct Config {
    pub riot_api_key: String,
    pub riot_region: Region,
    pub riot_rate_limit_per_second: NonZeroU32,
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    /// Tag line used for Riot ID lookups when a user registered without one.
    pub default_tag_line: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        const DEFAULT_DATABASE_URL: &str = "sqlite:riftboard.db";
        const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
        const DEFAULT_TAG_LINE: &str = "NA1";
        const DEFAULT_RIOT_RATE_LIMIT_PER_SECOND: u32 = 20;

        let riot_api_key = env::var("RIOT_API_KEY")
            .map_err(|_| AppError::Config("RIOT_API_KEY must be set".into()))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET must be set".into()))?;

        let riot_region = match env::var("RIOT_REGION") {
            Ok(value) => value.parse()?,
            Err(_) => Region::Americas,
        };

        let riot_rate_limit_per_second = env::var("RIOT_RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| {
                NonZeroU32::new(DEFAULT_RIOT_RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN)
            });

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        let default_tag_line =
            env::var("DEFAULT_TAG_LINE").unwrap_or_else(|_| DEFAULT_TAG_LINE.into());

        Ok(Self {
            riot_api_key,
            riot_region,
            riot_rate_limit_per_second,
            database_url,
            bind_addr,
            jwt_secret,
            default_tag_line,
        })
    }
}
