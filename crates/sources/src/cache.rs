use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use algobell_core::clock::Clock;
use algobell_core::types::Contest;
use chrono::{DateTime, Duration, Utc};

/// TTL cache for contest listings, keyed by platform name (plus one
/// aggregate key). Owned by the aggregator instance rather than living in
/// process-global state, with the clock injected for deterministic tests.
pub struct SourceCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    fetched_at: DateTime<Utc>,
    contests: Vec<Contest>,
}

impl SourceCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<Contest>> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if self.clock.now() - entry.fetched_at < self.ttl {
            Some(entry.contests.clone())
        } else {
            None
        }
    }

    pub fn put(&self, key: &str, contests: Vec<Contest>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            CacheEntry {
                fetched_at: self.clock.now(),
                contests,
            },
        );
    }
}
