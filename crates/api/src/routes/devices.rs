use algobell_db::queries::device_tokens;
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
        .route("/v1/devices/tokens", post(save_token).get(list_tokens))
        .route("/v1/devices/tokens/{token}", delete(remove_token))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveTokenRequest {
    token: String,
    device_info: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    device_info: Option<String>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenListResponse {
    items: Vec<TokenResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveTokenResponse {
    removed: bool,
}

async fn save_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<SaveTokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if payload.token.trim().is_empty() {
        return Err(AppError::BadRequest("token required".to_string())
            .with_request_id(&request_id.0));
    }

    let saved = device_tokens::upsert(
        &state.db,
        &auth.user_id,
        &payload.token,
        payload.device_info.as_deref(),
    )
    .await
    .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(TokenResponse {
        token: saved.token,
        device_info: saved.device_info,
        updated_at: saved.updated_at,
    }))
}

async fn list_tokens(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<TokenListResponse>> {
    let tokens = device_tokens::list_by_user(&state.db, &auth.user_id)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(TokenListResponse {
        items: tokens
            .into_iter()
            .map(|t| TokenResponse {
                token: t.token,
                device_info: t.device_info,
                updated_at: t.updated_at,
            })
            .collect(),
    }))
}

async fn remove_token(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(token): Path<String>,
) -> ApiResult<Json<RemoveTokenResponse>> {
    let removed = device_tokens::delete_by_token(&state.db, &token)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(RemoveTokenResponse { removed }))
}
