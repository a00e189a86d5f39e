use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Pro,
}

/// A user's intent to be reminded about one contest. Unique on
/// (user_id, contest_id); rows outlive the contest (no automatic expiry).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub contest_id: String,
    pub contest_name: String,
    pub platform: String,
    pub start_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One row per user; materialized with defaults on first read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferences {
    pub user_id: String,
    pub reminder_60m: bool,
    pub reminder_30m: bool,
    pub reminder_10m: bool,
    pub reminder_live: bool,
    pub notify_whatsapp: bool,
    pub notify_push: bool,
    pub notify_email: bool,
    pub notify_alarm: bool,
    pub tier: AccountTier,
    pub updated_at: DateTime<Utc>,
}

/// Push token for one installed client instance; unique on (user_id, token).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceToken {
    pub user_id: String,
    pub token: String,
    pub device_info: Option<String>,
    pub updated_at: DateTime<Utc>,
}
