use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiResult, AppError},
    middleware::auth::AuthContext,
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/subscriptions", post(subscribe).get(list_subscriptions))
        .route("/v1/subscriptions/{contest_id}", delete(unsubscribe))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest {
    contest_id: String,
    contest_name: String,
    platform: String,
    start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeResponse {
    id: String,
    contest_id: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionListResponse {
    items: Vec<SubscriptionListItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionListItem {
    id: String,
    contest_id: String,
    contest_name: String,
    platform: String,
    start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnsubscribeResponse {
    contest_id: String,
    status: String,
}

/// Idempotent: subscribing to the same contest twice returns the original
/// row and never creates a duplicate.
async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<SubscribeRequest>,
) -> ApiResult<Json<SubscribeResponse>> {
    if payload.contest_id.trim().is_empty() || payload.contest_name.trim().is_empty() {
        return Err(
            AppError::BadRequest("contestId and contestName required".to_string())
                .with_request_id(&request_id.0),
        );
    }

    let id = format!("sub_{}", nanoid::nanoid!(12));
    let subscription = algobell_db::queries::subscriptions::upsert(
        &state.db,
        &id,
        &auth.user_id,
        &payload.contest_id,
        &payload.contest_name,
        &payload.platform,
        payload.start_time,
    )
    .await
    .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(SubscribeResponse {
        id: subscription.id,
        contest_id: subscription.contest_id,
        created_at: subscription.created_at,
    }))
}

async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<SubscriptionListResponse>> {
    let items = algobell_db::queries::subscriptions::list_by_user(&state.db, &auth.user_id)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(SubscriptionListResponse {
        items: items
            .into_iter()
            .map(|sub| SubscriptionListItem {
                id: sub.id,
                contest_id: sub.contest_id,
                contest_name: sub.contest_name,
                platform: sub.platform,
                start_time: sub.start_time,
            })
            .collect(),
    }))
}

async fn unsubscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
    Path(contest_id): Path<String>,
) -> ApiResult<Json<UnsubscribeResponse>> {
    let removed =
        algobell_db::queries::subscriptions::delete(&state.db, &auth.user_id, &contest_id)
            .await
            .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    if !removed {
        return Err(AppError::NotFound("subscription not found".to_string())
            .with_request_id(&request_id.0));
    }

    Ok(Json(UnsubscribeResponse {
        contest_id,
        status: "unsubscribed".to_string(),
    }))
}
