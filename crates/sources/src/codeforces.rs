use algobell_core::types::{Contest, Platform};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::SourceError;
use crate::source::ContestSource;

/// Upcoming/running contests only; the Codeforces API also lists years of
/// finished rounds.
const MAX_CONTESTS: usize = 20;

pub struct CodeforcesSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CfEnvelope {
    status: String,
    #[serde(default)]
    result: Vec<CfContest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CfContest {
    id: i64,
    name: String,
    phase: String,
    duration_seconds: i64,
    start_time_seconds: Option<i64>,
}

impl CodeforcesSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ContestSource for CodeforcesSource {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError> {
        let url = format!("{}/api/contest.list", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let envelope: CfEnvelope = response.json().await?;
        if envelope.status != "OK" {
            return Err(SourceError::Payload(format!(
                "codeforces status {}",
                envelope.status
            )));
        }

        let contests = envelope
            .result
            .into_iter()
            .filter(|c| c.phase == "BEFORE" || c.phase == "CODING")
            .take(MAX_CONTESTS)
            .filter_map(|c| {
                let start_seconds = c.start_time_seconds?;
                let start_time = Utc.timestamp_opt(start_seconds, 0).single()?;
                let end_time = Utc
                    .timestamp_opt(start_seconds + c.duration_seconds, 0)
                    .single()?;
                Some(Contest::new(
                    format!("cf-{}", c.id),
                    c.name,
                    Platform::Codeforces,
                    start_time,
                    end_time,
                    format!("https://codeforces.com/contest/{}", c.id),
                    now,
                ))
            })
            .collect();

        Ok(contests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algobell_core::types::Difficulty;
    use httpmock::prelude::*;
    use serde_json::json;

    fn source(server: &MockServer) -> CodeforcesSource {
        CodeforcesSource::new(reqwest::Client::new(), server.base_url())
    }

    #[tokio::test]
    async fn test_fetch_filters_finished_and_unscheduled() {
        let server = MockServer::start();
        let now = Utc.timestamp_opt(1_750_000_000, 0).unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/api/contest.list");
            then.status(200).json_body(json!({
                "status": "OK",
                "result": [
                    {"id": 1990, "name": "Codeforces Round 990 (Div. 2)", "phase": "BEFORE",
                     "durationSeconds": 7200, "startTimeSeconds": 1_750_003_600},
                    {"id": 1985, "name": "Codeforces Round 985 (Div. 1)", "phase": "FINISHED",
                     "durationSeconds": 7200, "startTimeSeconds": 1_749_000_000},
                    {"id": 2001, "name": "Unscheduled Round", "phase": "BEFORE",
                     "durationSeconds": 7200, "startTimeSeconds": null},
                    {"id": 1989, "name": "Codeforces Round 989 (Div. 3)", "phase": "CODING",
                     "durationSeconds": 7200, "startTimeSeconds": 1_749_999_000}
                ]
            }));
        });

        let contests = source(&server).fetch(now).await.unwrap();
        assert_eq!(contests.len(), 2);

        assert_eq!(contests[0].id, "cf-1990");
        assert_eq!(contests[0].platform, Platform::Codeforces);
        assert_eq!(contests[0].difficulty, Difficulty::Medium);
        assert_eq!(contests[0].link, "https://codeforces.com/contest/1990");
        assert!(contests[0].is_upcoming && !contests[0].is_live);

        assert_eq!(contests[1].id, "cf-1989");
        assert!(contests[1].is_live && !contests[1].is_upcoming);
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_ok_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/contest.list");
            then.status(200)
                .json_body(json!({"status": "FAILED", "comment": "limit exceeded"}));
        });

        let err = source(&server).fetch(Utc::now()).await.unwrap_err();
        assert!(matches!(err, SourceError::Payload(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_http_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/contest.list");
            then.status(503);
        });

        let err = source(&server).fetch(Utc::now()).await.unwrap_err();
        assert!(matches!(err, SourceError::Status(_)));
    }
}
