//! Adapters for platforms served through the Contest-Hive aggregation API.
//!
//! LeetCode, CodeChef, and AtCoder have no stable public contest APIs, so
//! their listings come from `GET {base}/api/{platform}`. The payload is
//! either `{"data": [...]}` or a bare array; both shapes are accepted.

use algobell_core::types::{Contest, Platform};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::SourceError;
use crate::source::ContestSource;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HiveEnvelope {
    Wrapped { data: Vec<HiveContest> },
    Bare(Vec<HiveContest>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HiveContest {
    name: String,
    url: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(Clone)]
struct HiveClient {
    client: reqwest::Client,
    base_url: String,
}

impl HiveClient {
    fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(
        &self,
        slug: &str,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> Result<Vec<Contest>, SourceError> {
        let url = format!("{}/api/{}", self.base_url, slug);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let envelope: HiveEnvelope = response
            .json()
            .await
            .map_err(|err| SourceError::Payload(err.to_string()))?;
        let raw = match envelope {
            HiveEnvelope::Wrapped { data } => data,
            HiveEnvelope::Bare(data) => data,
        };

        let contests = raw
            .into_iter()
            .map(|c| {
                let id = format!("{}-{}", slug, slugify(&c.name));
                Contest::new(id, c.name, platform.clone(), c.start_time, c.end_time, c.url, now)
            })
            .collect();

        Ok(contests)
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

pub struct LeetCodeSource {
    hive: HiveClient,
}

impl LeetCodeSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            hive: HiveClient::new(client, base_url),
        }
    }
}

#[async_trait]
impl ContestSource for LeetCodeSource {
    fn platform(&self) -> Platform {
        Platform::LeetCode
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
        self.hive.fetch("leetcode", Platform::LeetCode, now).await
    }
}

pub struct CodeChefSource {
    hive: HiveClient,
}

impl CodeChefSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            hive: HiveClient::new(client, base_url),
        }
    }
}

#[async_trait]
impl ContestSource for CodeChefSource {
    fn platform(&self) -> Platform {
        Platform::CodeChef
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
        self.hive.fetch("codechef", Platform::CodeChef, now).await
    }
}

pub struct AtCoderSource {
    hive: HiveClient,
}

impl AtCoderSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            hive: HiveClient::new(client, base_url),
        }
    }
}

#[async_trait]
impl ContestSource for AtCoderSource {
    fn platform(&self) -> Platform {
        Platform::AtCoder
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
        self.hive.fetch("atcoder", Platform::AtCoder, now).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Weekly Contest 380"), "weekly-contest-380");
        assert_eq!(slugify("  Starters   120 "), "starters-120");
    }

    #[tokio::test]
    async fn test_fetch_wrapped_payload() {
        let server = MockServer::start();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/api/leetcode");
            then.status(200).json_body(json!({
                "data": [{
                    "name": "Weekly Contest 380",
                    "url": "https://leetcode.com/contest/weekly-contest-380",
                    "startTime": "2025-06-22T02:30:00Z",
                    "endTime": "2025-06-22T04:00:00Z",
                    "duration": 5400,
                    "platform": "leetcode",
                    "status": "UPCOMING"
                }]
            }));
        });

        let source = LeetCodeSource::new(reqwest::Client::new(), server.base_url());
        let contests = source.fetch(now).await.unwrap();
        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].id, "leetcode-weekly-contest-380");
        assert_eq!(contests[0].platform, Platform::LeetCode);
        assert_eq!(contests[0].duration_seconds, 5400);
        assert!(contests[0].is_upcoming);
    }

    #[tokio::test]
    async fn test_fetch_bare_array_payload() {
        let server = MockServer::start();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/api/atcoder");
            then.status(200).json_body(json!([{
                "name": "AtCoder Beginner Contest 410",
                "url": "https://atcoder.jp/contests/abc410",
                "startTime": "2025-06-15T11:30:00Z",
                "endTime": "2025-06-15T13:10:00Z",
                "duration": 6000
            }]));
        });

        let source = AtCoderSource::new(reqwest::Client::new(), server.base_url());
        let contests = source.fetch(now).await.unwrap();
        assert_eq!(contests.len(), 1);
        assert_eq!(contests[0].platform, Platform::AtCoder);
        // Started half an hour ago, ends in the future.
        assert!(contests[0].is_live && !contests[0].is_upcoming);
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/codechef");
            then.status(200).json_body(json!({"unexpected": true}));
        });

        let source = CodeChefSource::new(reqwest::Client::new(), server.base_url());
        let err = source.fetch(Utc::now()).await.unwrap_err();
        assert!(matches!(err, SourceError::Payload(_)));
    }
}
