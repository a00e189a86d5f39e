use std::sync::Arc;

use algobell_core::clock::Clock;
use algobell_core::config::Settings;
use algobell_core::types::Contest;
use futures_util::future::join_all;
use tracing::{info, warn};

use crate::cache::SourceCache;
use crate::codeforces::CodeforcesSource;
use crate::contest_hive::{AtCoderSource, CodeChefSource, LeetCodeSource};
use crate::fallback;
use crate::source::ContestSource;

/// Cache key for the merged cross-platform listing.
const AGGREGATE_KEY: &str = "__aggregate__";

/// Merges every platform adapter's output into one listing sorted by start
/// time. Per-platform failures are isolated; when everything fails the
/// hardcoded fallback seeds keep the listing non-empty.
pub struct ContestAggregator {
    sources: Vec<Box<dyn ContestSource>>,
    cache: SourceCache,
    clock: Arc<dyn Clock>,
}

impl ContestAggregator {
    pub fn new(
        sources: Vec<Box<dyn ContestSource>>,
        cache_ttl_secs: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            cache: SourceCache::new(cache_ttl_secs, clock.clone()),
            clock,
        }
    }

    /// Standard adapter set: Codeforces direct plus Contest-Hive for the
    /// platforms without public APIs.
    pub fn from_settings(
        settings: &Settings,
        client: reqwest::Client,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sources: Vec<Box<dyn ContestSource>> = vec![
            Box::new(CodeforcesSource::new(
                client.clone(),
                settings.codeforces_url.clone(),
            )),
            Box::new(LeetCodeSource::new(
                client.clone(),
                settings.contest_hive_url.clone(),
            )),
            Box::new(CodeChefSource::new(
                client.clone(),
                settings.contest_hive_url.clone(),
            )),
            Box::new(AtCoderSource::new(
                client,
                settings.contest_hive_url.clone(),
            )),
        ];
        Self::new(sources, settings.contest_cache_ttl_secs, clock)
    }

    /// Fetch every platform concurrently, keep the fulfilled results, sort
    /// ascending by start time. All adapters settle before this returns; a
    /// failing platform contributes an empty list and never fails the pass.
    pub async fn fetch_all(&self) -> Vec<Contest> {
        if let Some(cached) = self.cache.get(AGGREGATE_KEY) {
            return cached;
        }

        let now = self.clock.now();
        let fetches = self.sources.iter().map(|source| async move {
            let platform = source.platform();
            if let Some(cached) = self.cache.get(platform.name()) {
                return cached;
            }
            match source.fetch(now).await {
                Ok(contests) => {
                    self.cache.put(platform.name(), contests.clone());
                    contests
                }
                Err(err) => {
                    warn!(platform = %platform, error = %err, "contest fetch failed");
                    Vec::new()
                }
            }
        });

        let mut contests: Vec<Contest> = join_all(fetches).await.into_iter().flatten().collect();

        if contests.is_empty() {
            warn!("all contest sources failed, serving fallback seeds");
            contests = fallback::seed_contests(now);
        }

        contests.sort_by_key(|c| c.start_time);
        info!(count = contests.len(), "aggregated contests");

        self.cache.put(AGGREGATE_KEY, contests.clone());
        contests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use algobell_core::clock::ManualClock;
    use algobell_core::types::Platform;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        platform: Platform,
        contests: Vec<Contest>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ContestSource for StaticSource {
        fn platform(&self) -> Platform {
            self.platform.clone()
        }

        async fn fetch(&self, _now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.contests.clone())
        }
    }

    struct FailingSource {
        platform: Platform,
    }

    #[async_trait]
    impl ContestSource for FailingSource {
        fn platform(&self) -> Platform {
            self.platform.clone()
        }

        async fn fetch(&self, _now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
            Err(SourceError::Payload("boom".to_string()))
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap()
    }

    fn contest(id: &str, platform: Platform, start_in_hours: i64) -> Contest {
        let now = t0();
        let start = now + Duration::hours(start_in_hours);
        Contest::new(id, id, platform, start, start + Duration::hours(2), "link", now)
    }

    #[tokio::test]
    async fn test_merges_and_sorts_by_start_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources: Vec<Box<dyn ContestSource>> = vec![
            Box::new(StaticSource {
                platform: Platform::Codeforces,
                contests: vec![contest("cf-late", Platform::Codeforces, 10)],
                calls: calls.clone(),
            }),
            Box::new(StaticSource {
                platform: Platform::AtCoder,
                contests: vec![contest("ac-early", Platform::AtCoder, 2)],
                calls: calls.clone(),
            }),
        ];
        let aggregator =
            ContestAggregator::new(sources, 300, Arc::new(ManualClock::new(t0())));

        let contests = aggregator.fetch_all().await;
        assert_eq!(contests.len(), 2);
        assert_eq!(contests[0].id, "ac-early");
        assert_eq!(contests[1].id, "cf-late");
    }

    #[tokio::test]
    async fn test_single_source_failure_is_isolated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sources: Vec<Box<dyn ContestSource>> = vec![
            Box::new(FailingSource {
                platform: Platform::Codeforces,
            }),
            Box::new(StaticSource {
                platform: Platform::AtCoder,
                contests: vec![contest("ac-1", Platform::AtCoder, 2)],
                calls,
            }),
        ];
        let aggregator =
            ContestAggregator::new(sources, 300, Arc::new(ManualClock::new(t0())));

        let contests = aggregator.fetch_all().await;
        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].id, "ac-1");
    }

    #[tokio::test]
    async fn test_all_sources_failing_serves_fallback() {
        let sources: Vec<Box<dyn ContestSource>> = vec![
            Box::new(FailingSource {
                platform: Platform::Codeforces,
            }),
            Box::new(FailingSource {
                platform: Platform::LeetCode,
            }),
            Box::new(FailingSource {
                platform: Platform::CodeChef,
            }),
            Box::new(FailingSource {
                platform: Platform::AtCoder,
            }),
        ];
        let aggregator =
            ContestAggregator::new(sources, 300, Arc::new(ManualClock::new(t0())));

        let contests = aggregator.fetch_all().await;
        assert!(!contests.is_empty());
        assert!(contests.iter().all(|c| c.start_time > t0()));
    }

    #[tokio::test]
    async fn test_aggregate_cache_skips_refetch_within_ttl() {
        let calls = Arc::new(AtomicUsize::new(0));
        let clock = Arc::new(ManualClock::new(t0()));
        let sources: Vec<Box<dyn ContestSource>> = vec![Box::new(StaticSource {
            platform: Platform::Codeforces,
            contests: vec![contest("cf-1", Platform::Codeforces, 5)],
            calls: calls.clone(),
        })];
        let aggregator = ContestAggregator::new(sources, 300, clock.clone());

        aggregator.fetch_all().await;
        aggregator.fetch_all().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(301));
        aggregator.fetch_all().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
