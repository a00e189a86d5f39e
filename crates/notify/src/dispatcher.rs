use std::collections::HashMap;
use std::sync::Arc;

use algobell_core::clock::Clock;
use algobell_core::types::{NotificationPayload, ReminderWindow};
use algobell_db::models::UserPreferences;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::push::PushClient;
use crate::store::ReminderStore;

/// One delivered reminder, reported for observability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDetail {
    pub user_id: String,
    pub contest_name: String,
    pub offset: String,
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub details: Vec<ReminderDetail>,
}

impl ScanReport {
    pub fn sent(&self) -> usize {
        self.details.len()
    }
}

/// Whether this user wants a push reminder for this window. A missing
/// preference row is handled by the caller (skip).
pub fn should_notify(prefs: &UserPreferences, window: ReminderWindow) -> bool {
    if !prefs.notify_push {
        return false;
    }
    match window {
        ReminderWindow::Before60 => prefs.reminder_60m,
        ReminderWindow::Before30 => prefs.reminder_30m,
        ReminderWindow::Before10 => prefs.reminder_10m,
        ReminderWindow::Live => prefs.reminder_live,
    }
}

pub fn compose_title(contest_name: &str) -> String {
    format!("🔔 {contest_name}")
}

pub fn compose_body(contest_name: &str, platform: &str, window: ReminderWindow) -> String {
    match window {
        ReminderWindow::Live => format!("{contest_name} is LIVE NOW on {platform}! 🚀"),
        _ => format!(
            "{contest_name} starts in {} minutes on {platform}!",
            window.minutes()
        ),
    }
}

/// Stateless reminder scan, run on a fixed external cadence. Coordination
/// between invocations happens only through the durable stores; adjacent
/// bands can overlap across invocations, so delivery is at-least-once.
pub struct Dispatcher {
    store: Arc<dyn ReminderStore>,
    push: PushClient,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ReminderStore>, push: PushClient, clock: Arc<dyn Clock>) -> Self {
        Self { store, push, clock }
    }

    /// One scan pass over the four reminder windows. Store errors skip the
    /// affected window and delivery errors skip the affected subscription;
    /// the scan always completes and reports what was sent.
    pub async fn run_scan(&self) -> ScanReport {
        let now = self.clock.now();
        let mut report = ScanReport::default();

        for window in ReminderWindow::ALL {
            let (from, to) = window.band(now);

            let subs = match self.store.subscriptions_starting_between(from, to).await {
                Ok(subs) => subs,
                Err(err) => {
                    warn!(window = window.label(), error = %err, "subscription scan failed");
                    continue;
                }
            };
            if subs.is_empty() {
                debug!(window = window.label(), "no subscriptions in band");
                continue;
            }

            let mut user_ids: Vec<String> = subs.iter().map(|s| s.user_id.clone()).collect();
            user_ids.sort();
            user_ids.dedup();

            let prefs = match self.store.preferences_for_users(&user_ids).await {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!(window = window.label(), error = %err, "preference fetch failed");
                    continue;
                }
            };
            let pref_map: HashMap<&str, &UserPreferences> =
                prefs.iter().map(|p| (p.user_id.as_str(), p)).collect();

            for sub in &subs {
                let Some(user_prefs) = pref_map.get(sub.user_id.as_str()) else {
                    debug!(user_id = %sub.user_id, "no preference row, skipping");
                    continue;
                };
                if !should_notify(user_prefs, window) {
                    continue;
                }

                let payload = NotificationPayload {
                    title: compose_title(&sub.contest_name),
                    body: compose_body(&sub.contest_name, &sub.platform, window),
                    icon: None,
                    data: HashMap::from([
                        ("contestId".to_string(), sub.contest_id.clone()),
                        ("platform".to_string(), sub.platform.clone()),
                        ("type".to_string(), "contest_reminder".to_string()),
                    ]),
                };

                let fanout = self
                    .push
                    .send_to_user(self.store.as_ref(), &sub.user_id, &payload)
                    .await;
                match fanout {
                    Ok(fanout) if fanout.success() => {
                        report.details.push(ReminderDetail {
                            user_id: sub.user_id.clone(),
                            contest_name: sub.contest_name.clone(),
                            offset: window.label().to_string(),
                        });
                    }
                    Ok(_) => {
                        debug!(
                            user_id = %sub.user_id,
                            contest = %sub.contest_name,
                            "no token accepted the reminder"
                        );
                    }
                    Err(err) => {
                        warn!(user_id = %sub.user_id, error = %err, "reminder delivery failed");
                    }
                }
            }
        }

        info!(sent = report.sent(), "reminder scan complete");
        report
    }
}
