use algobell_db::models::{AccountTier, UserPreferences};
use algobell_db::queries::preferences::{self, PreferencesUpdate};
use axum::{
    extract::State,
    routing::get,
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
        .route(
            "/v1/preferences",
            get(get_preferences).patch(update_preferences),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePreferencesRequest {
    reminder_60m: Option<bool>,
    reminder_30m: Option<bool>,
    reminder_10m: Option<bool>,
    reminder_live: Option<bool>,
    notify_whatsapp: Option<bool>,
    notify_push: Option<bool>,
    notify_email: Option<bool>,
    notify_alarm: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreferencesResponse {
    reminder_60m: bool,
    reminder_30m: bool,
    reminder_10m: bool,
    reminder_live: bool,
    notify_whatsapp: bool,
    notify_push: bool,
    notify_email: bool,
    notify_alarm: bool,
    tier: AccountTier,
    updated_at: DateTime<Utc>,
}

impl From<UserPreferences> for PreferencesResponse {
    fn from(prefs: UserPreferences) -> Self {
        Self {
            reminder_60m: prefs.reminder_60m,
            reminder_30m: prefs.reminder_30m,
            reminder_10m: prefs.reminder_10m,
            reminder_live: prefs.reminder_live,
            notify_whatsapp: prefs.notify_whatsapp,
            notify_push: prefs.notify_push,
            notify_email: prefs.notify_email,
            notify_alarm: prefs.notify_alarm,
            tier: prefs.tier,
            updated_at: prefs.updated_at,
        }
    }
}

/// Paid channels a free-tier user tried to switch on, if any. Disabling is
/// always allowed.
fn gated_channel(tier: AccountTier, update: &UpdatePreferencesRequest) -> Option<&'static str> {
    if tier == AccountTier::Pro {
        return None;
    }
    if update.notify_whatsapp == Some(true) {
        return Some("WhatsApp");
    }
    if update.notify_email == Some(true) {
        return Some("Email");
    }
    None
}

/// Defaults are materialized on first read, so this never 404s.
async fn get_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = preferences::get_or_create(&state.db, &auth.user_id)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(prefs.into()))
}

async fn update_preferences(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<PreferencesResponse>> {
    let current = preferences::get_or_create(&state.db, &auth.user_id)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    // The gate rejects before any write, so a denied toggle never mutates.
    if let Some(channel) = gated_channel(current.tier, &payload) {
        return Err(AppError::UpgradeRequired(format!(
            "{channel} alerts are a Pro feature - upgrade to unlock"
        ))
        .with_request_id(&request_id.0));
    }

    let update = PreferencesUpdate {
        reminder_60m: payload.reminder_60m,
        reminder_30m: payload.reminder_30m,
        reminder_10m: payload.reminder_10m,
        reminder_live: payload.reminder_live,
        notify_whatsapp: payload.notify_whatsapp,
        notify_push: payload.notify_push,
        notify_email: payload.notify_email,
        notify_alarm: payload.notify_alarm,
    };

    let prefs = preferences::update(&state.db, &auth.user_id, &update)
        .await
        .map_err(|_| AppError::Internal.with_request_id(&request_id.0))?;

    Ok(Json(prefs.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tier_cannot_enable_whatsapp() {
        let update = UpdatePreferencesRequest {
            notify_whatsapp: Some(true),
            ..Default::default()
        };
        assert_eq!(gated_channel(AccountTier::Free, &update), Some("WhatsApp"));
    }

    #[test]
    fn test_free_tier_cannot_enable_email() {
        let update = UpdatePreferencesRequest {
            notify_email: Some(true),
            ..Default::default()
        };
        assert_eq!(gated_channel(AccountTier::Free, &update), Some("Email"));
    }

    #[test]
    fn test_free_tier_can_disable_paid_channels() {
        let update = UpdatePreferencesRequest {
            notify_whatsapp: Some(false),
            notify_email: Some(false),
            ..Default::default()
        };
        assert_eq!(gated_channel(AccountTier::Free, &update), None);
    }

    #[test]
    fn test_free_tier_can_toggle_free_channels() {
        let update = UpdatePreferencesRequest {
            reminder_30m: Some(false),
            notify_push: Some(true),
            notify_alarm: Some(true),
            ..Default::default()
        };
        assert_eq!(gated_channel(AccountTier::Free, &update), None);
    }

    #[test]
    fn test_pro_tier_can_enable_paid_channels() {
        let update = UpdatePreferencesRequest {
            notify_whatsapp: Some(true),
            notify_email: Some(true),
            ..Default::default()
        };
        assert_eq!(gated_channel(AccountTier::Pro, &update), None);
    }
}
