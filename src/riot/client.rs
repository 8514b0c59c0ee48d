use std::{fmt, num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use super::metrics::RequestMetrics;
use super::region::Region;
use super::traits::LolApi;
use super::types::{RiotApiError, RiotApiResponse};

pub struct RiotClient {
    client: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Scheme and host every route is appended to.
    base_url: String,
    /// Riot API Key
    key: String,
    metrics: Arc<RequestMetrics>,
}

impl RiotClient {
    pub fn new(key: String, region: Region, rate_limit_per_second: NonZeroU32) -> Self {
        Self::with_base_url(key, region.base_url(), rate_limit_per_second)
    }

    pub fn with_base_url(
        key: String,
        base_url: impl Into<String>,
        rate_limit_per_second: NonZeroU32,
    ) -> Self {
        let quota = Quota::per_second(rate_limit_per_second);

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client: reqwest::Client::new(),
            limiter: RateLimiter::direct(quota),
            metrics: RequestMetrics::new(base_url.clone()),
            base_url,
            key,
        }
    }

    pub fn metrics(&self) -> Arc<RequestMetrics> {
        self.metrics.clone()
    }

    /// Shared GET logic: waits on the rate limiter, then decodes a 2xx JSON body.
    pub(super) async fn get<T: DeserializeOwned>(&self, path: &str) -> RiotApiResponse<T> {
        self.limiter.until_ready().await;
        self.metrics.record_request();

        let url = format!("{}{}", self.base_url, path);
        trace!(url, "🛰️ Riot API request");

        let res = self
            .client
            .get(&url)
            .header("X-Riot-Token", &self.key)
            .send()
            .await
            .inspect_err(|_| self.metrics.record_failure())?;

        let status = res.status();
        if !status.is_success() {
            self.metrics.record_failure();
            warn!(status = status.as_u16(), path, "🛰️ ⚠️ Riot API returned an error");
            return Err(RiotApiError::from_status(status));
        }

        Ok(res.json().await?)
    }
}

impl fmt::Debug for RiotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiotClient")
            .field("base_url", &self.base_url)
            .field("requests", &self.metrics.requests())
            .finish()
    }
}

impl LolApi for RiotClient {}
