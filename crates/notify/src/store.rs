use algobell_db::models::{DeviceToken, Subscription, UserPreferences};
use algobell_db::queries::{device_tokens, preferences, subscriptions};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// The slice of the durable stores the reminder pipeline reads and corrects.
/// Implemented by [`PgPool`] in production; tests substitute an in-memory
/// store to drive scans without a database.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn subscriptions_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Subscription>, sqlx::Error>;

    async fn preferences_for_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserPreferences>, sqlx::Error>;

    async fn tokens_for_user(&self, user_id: &str) -> Result<Vec<DeviceToken>, sqlx::Error>;

    async fn delete_token(&self, token: &str) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl ReminderStore for PgPool {
    async fn subscriptions_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        subscriptions::list_starting_between(self, from, to).await
    }

    async fn preferences_for_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<UserPreferences>, sqlx::Error> {
        preferences::list_by_users(self, user_ids).await
    }

    async fn tokens_for_user(&self, user_id: &str) -> Result<Vec<DeviceToken>, sqlx::Error> {
        device_tokens::list_by_user(self, user_id).await
    }

    async fn delete_token(&self, token: &str) -> Result<bool, sqlx::Error> {
        device_tokens::delete_by_token(self, token).await
    }
}
