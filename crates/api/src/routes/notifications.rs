use algobell_core::types::NotificationPayload;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiResult, AppError},
    state::{AppState, RequestId, METRICS},
};
use algobell_notify::push::TokenDelivery;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/notifications/send", post(send_notification))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationRequest {
    user_id: Option<String>,
    token: Option<String>,
    notification: NotificationPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNotificationResponse {
    success: bool,
    sent: usize,
    total: usize,
    results: Vec<TokenDelivery>,
}

/// Direct push delivery: one target token, or fan-out across every token
/// registered for a user. Exactly one of `userId`/`token` must be supplied.
async fn send_notification(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<SendNotificationRequest>,
) -> ApiResult<Json<SendNotificationResponse>> {
    if payload.notification.title.trim().is_empty()
        || payload.notification.body.trim().is_empty()
    {
        return Err(
            AppError::BadRequest("notification title and body required".to_string())
                .with_request_id(&request_id.0),
        );
    }

    let results = match (payload.user_id.as_deref(), payload.token.as_deref()) {
        (Some(user_id), None) => state
            .push
            .send_to_user(&state.db, user_id, &payload.notification)
            .await
            .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?
            .results,
        (None, Some(token)) => {
            let delivery = state
                .push
                .send_to_token(token, &payload.notification)
                .await
                .unwrap_or_else(|err| TokenDelivery {
                    token: token.to_string(),
                    success: false,
                    error: Some(err.to_string()),
                });
            vec![delivery]
        }
        _ => {
            return Err(
                AppError::BadRequest("exactly one of userId or token is required".to_string())
                    .with_request_id(&request_id.0),
            )
        }
    };

    let sent = results.iter().filter(|r| r.success).count();
    METRICS.record_notifications_sent(sent as u64);

    Ok(Json(SendNotificationResponse {
        success: sent > 0,
        sent,
        total: results.len(),
        results,
    }))
}
