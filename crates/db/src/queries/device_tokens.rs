use sqlx::PgPool;

use crate::models::DeviceToken;

/// Register or refresh a push token. Re-saving an existing (user, token)
/// pair updates device_info and updated_at without creating a duplicate.
pub async fn upsert(
    pool: &PgPool,
    user_id: &str,
    token: &str,
    device_info: Option<&str>,
) -> Result<DeviceToken, sqlx::Error> {
    sqlx::query_as::<_, DeviceToken>(
        r#"
        INSERT INTO device_tokens (user_id, token, device_info)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, token)
        DO UPDATE SET device_info = EXCLUDED.device_info, updated_at = now()
        RETURNING user_id, token, device_info, updated_at
        "#,
    )
    .bind(user_id)
    .bind(token)
    .bind(device_info)
    .fetch_one(pool)
    .await
}

/// Delete by token value alone; tokens are not shared across users in
/// practice, but the contract does not enforce that.
pub async fn delete_by_token(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM device_tokens WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<DeviceToken>, sqlx::Error> {
    sqlx::query_as::<_, DeviceToken>(
        r#"
        SELECT user_id, token, device_info, updated_at
        FROM device_tokens
        WHERE user_id = $1
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
