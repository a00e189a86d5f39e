use sqlx::PgPool;

use crate::models::UserPreferences;

const COLUMNS: &str = "user_id, reminder_60m, reminder_30m, reminder_10m, reminder_live, \
     notify_whatsapp, notify_push, notify_email, notify_alarm, tier, updated_at";

/// Field-by-field preference update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct PreferencesUpdate {
    pub reminder_60m: Option<bool>,
    pub reminder_30m: Option<bool>,
    pub reminder_10m: Option<bool>,
    pub reminder_live: Option<bool>,
    pub notify_whatsapp: Option<bool>,
    pub notify_push: Option<bool>,
    pub notify_email: Option<bool>,
    pub notify_alarm: Option<bool>,
}

/// Fetch a user's preferences, materializing the default row on first read.
/// Column defaults in the schema supply the initial values.
pub async fn get_or_create(
    pool: &PgPool,
    user_id: &str,
) -> Result<UserPreferences, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_preferences (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, UserPreferences>(&format!(
        "SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    user_id: &str,
    update: &PreferencesUpdate,
) -> Result<UserPreferences, sqlx::Error> {
    sqlx::query_as::<_, UserPreferences>(&format!(
        r#"
        UPDATE user_preferences
        SET reminder_60m = COALESCE($2, reminder_60m),
            reminder_30m = COALESCE($3, reminder_30m),
            reminder_10m = COALESCE($4, reminder_10m),
            reminder_live = COALESCE($5, reminder_live),
            notify_whatsapp = COALESCE($6, notify_whatsapp),
            notify_push = COALESCE($7, notify_push),
            notify_email = COALESCE($8, notify_email),
            notify_alarm = COALESCE($9, notify_alarm),
            updated_at = now()
        WHERE user_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(update.reminder_60m)
    .bind(update.reminder_30m)
    .bind(update.reminder_10m)
    .bind(update.reminder_live)
    .bind(update.notify_whatsapp)
    .bind(update.notify_push)
    .bind(update.notify_email)
    .bind(update.notify_alarm)
    .fetch_one(pool)
    .await
}

/// Batch fetch for the dispatcher: one query for all affected users.
pub async fn list_by_users(
    pool: &PgPool,
    user_ids: &[String],
) -> Result<Vec<UserPreferences>, sqlx::Error> {
    sqlx::query_as::<_, UserPreferences>(&format!(
        "SELECT {COLUMNS} FROM user_preferences WHERE user_id = ANY($1)"
    ))
    .bind(user_ids)
    .fetch_all(pool)
    .await
}
