//! On-device alarm scheduling: local notifications fired at
//! `start_time - offset` without going through the push gateway.
//!
//! Alarms are explicit cancellable tasks keyed by a stable id derived from
//! (contest, offset), so re-scheduling the same pair replaces the previous
//! alarm and cancellation always targets the alarm it created.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use algobell_core::clock::Clock;
use algobell_core::types::Platform;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ContestAlarm {
    pub contest_id: String,
    pub contest_name: String,
    pub platform: Platform,
    pub start_time: DateTime<Utc>,
    pub offset_minutes: i64,
}

/// Stable numeric id for a (contest, offset) pair. The same pair always maps
/// to the same id, so it cancels exactly the alarm it scheduled.
pub fn alarm_id(contest_id: &str, offset_minutes: i64) -> i32 {
    let digest = Sha256::digest(format!("{contest_id}:{offset_minutes}").as_bytes());
    i32::from_be_bytes([digest[0] & 0x7f, digest[1], digest[2], digest[3]])
}

type AlarmNotifier = Arc<dyn Fn(ContestAlarm) + Send + Sync>;

pub struct AlarmScheduler {
    clock: Arc<dyn Clock>,
    notifier: AlarmNotifier,
    pending: Arc<Mutex<HashMap<i32, JoinHandle<()>>>>,
}

impl AlarmScheduler {
    pub fn new(clock: Arc<dyn Clock>, notifier: AlarmNotifier) -> Self {
        Self {
            clock,
            notifier,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule a local alarm at `start_time - offset`. Returns the alarm id,
    /// or `None` when the trigger time is already in the past (never
    /// schedules into the past). Re-scheduling an existing (contest, offset)
    /// pair replaces the earlier alarm.
    pub fn schedule(&self, alarm: ContestAlarm) -> Option<i32> {
        let fire_at = alarm.start_time - Duration::minutes(alarm.offset_minutes);
        let now = self.clock.now();
        if fire_at <= now {
            debug!(contest = %alarm.contest_id, "alarm time already passed, skipping");
            return None;
        }

        let id = alarm_id(&alarm.contest_id, alarm.offset_minutes);
        let delay = (fire_at - now).to_std().unwrap_or_default();
        let notifier = self.notifier.clone();
        let pending = self.pending.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.lock().unwrap().remove(&id);
            notifier(alarm);
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.insert(id, handle) {
            previous.abort();
        }
        info!(id, fire_at = %fire_at, "alarm scheduled");
        Some(id)
    }

    /// Cancel one alarm by id; returns whether an alarm was pending.
    pub fn cancel(&self, id: i32) -> bool {
        match self.pending.lock().unwrap().remove(&id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending alarm.
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap();
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }

    pub fn pending_ids(&self) -> Vec<i32> {
        self.pending.lock().unwrap().keys().copied().collect()
    }
}
