use algobell_core::types::{Contest, Platform};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SourceError;

/// One upstream contest listing. Each platform gets its own adapter that
/// normalizes that platform's schema into the common [`Contest`] shape.
#[async_trait]
pub trait ContestSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetch and normalize this platform's listing. `now` is the aggregation
    /// pass timestamp used to derive live/upcoming flags.
    async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>, SourceError>;
}
