use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use algobell_core::config::Settings;
use algobell_notify::dispatcher::Dispatcher;
use algobell_notify::push::PushClient;
use algobell_sources::aggregator::ContestAggregator;
use once_cell::sync::Lazy;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
    pub aggregator: Arc<ContestAggregator>,
    pub dispatcher: Arc<Dispatcher>,
    pub push: PushClient,
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub static METRICS: Lazy<Metrics> = Lazy::new(Metrics::default);

/// In-process counters surfaced at GET /metrics.
#[derive(Default)]
pub struct Metrics {
    requests_total: AtomicU64,
    responses_2xx: AtomicU64,
    responses_4xx: AtomicU64,
    responses_5xx: AtomicU64,
    notifications_sent: AtomicU64,
}

impl Metrics {
    pub fn record_http_request(&self, status: u16) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        match status {
            200..=299 => self.responses_2xx.fetch_add(1, Ordering::Relaxed),
            400..=499 => self.responses_4xx.fetch_add(1, Ordering::Relaxed),
            500..=599 => self.responses_5xx.fetch_add(1, Ordering::Relaxed),
            _ => 0,
        };
    }

    pub fn record_notifications_sent(&self, count: u64) {
        self.notifications_sent.fetch_add(count, Ordering::Relaxed);
    }

    pub fn gather(&self) -> String {
        format!(
            "algobell_http_requests_total {}\n\
             algobell_http_responses_2xx_total {}\n\
             algobell_http_responses_4xx_total {}\n\
             algobell_http_responses_5xx_total {}\n\
             algobell_notifications_sent_total {}\n",
            self.requests_total.load(Ordering::Relaxed),
            self.responses_2xx.load(Ordering::Relaxed),
            self.responses_4xx.load(Ordering::Relaxed),
            self.responses_5xx.load(Ordering::Relaxed),
            self.notifications_sent.load(Ordering::Relaxed),
        )
    }
}
