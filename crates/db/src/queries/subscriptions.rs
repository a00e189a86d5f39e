use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::Subscription;

/// Insert a subscription, or return the existing row when the user already
/// subscribed to this contest. Double-subscribe never creates a second row.
pub async fn upsert(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    contest_id: &str,
    contest_name: &str,
    platform: &str,
    start_time: DateTime<Utc>,
) -> Result<Subscription, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO contest_subscriptions (id, user_id, contest_id, contest_name, platform, start_time)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, contest_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(contest_id)
    .bind(contest_name)
    .bind(platform)
    .bind(start_time)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, user_id, contest_id, contest_name, platform, start_time, created_at
        FROM contest_subscriptions
        WHERE user_id = $1 AND contest_id = $2
        "#,
    )
    .bind(user_id)
    .bind(contest_id)
    .fetch_one(pool)
    .await
}

/// Delete a subscription; returns whether a row was removed.
pub async fn delete(
    pool: &PgPool,
    user_id: &str,
    contest_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM contest_subscriptions
        WHERE user_id = $1 AND contest_id = $2
        "#,
    )
    .bind(user_id)
    .bind(contest_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, user_id, contest_id, contest_name, platform, start_time, created_at
        FROM contest_subscriptions
        WHERE user_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Subscriptions whose contest starts inside `[from, to]`; the dispatcher's
/// per-window band scan.
pub async fn list_starting_between(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT id, user_id, contest_id, contest_name, platform, start_time, created_at
        FROM contest_subscriptions
        WHERE start_time >= $1 AND start_time <= $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
