use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span};

/// How often the request summary is logged.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Outbound Riot API traffic of one routing host.
#[derive(Debug)]
pub struct RequestMetrics {
    host: String,
    started: Instant,
    requests: AtomicU64,
    failures: AtomicU64,
}

impl RequestMetrics {
    pub fn new(host: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            host: host.into(),
            started: Instant::now(),
            requests: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Non-2xx answers and transport errors.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn requests_per_minute(&self, elapsed: Duration) -> f64 {
        let minutes = elapsed.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.requests() as f64 / minutes
        } else {
            0.0
        }
    }

    /// Logs a summary every [`REPORT_INTERVAL`], skipping idle periods.
    pub async fn log_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(REPORT_INTERVAL);
        let mut last_reported = 0;

        loop {
            interval.tick().await;

            let requests = self.requests();
            if requests == last_reported {
                continue;
            }
            last_reported = requests;

            let per_minute = self.requests_per_minute(self.started.elapsed());
            let span = info_span!("📊", host = %self.host);
            async {
                info!(
                    requests,
                    failures = self.failures(),
                    "🛰️ Riot API usage (avg {per_minute:.2} req/min)"
                );
            }
            .instrument(span)
            .await
        }
    }
}
