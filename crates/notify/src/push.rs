use algobell_core::types::NotificationPayload;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::ReminderStore;

const DEFAULT_ICON: &str = "/favicon.ico";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push gateway returned status {0}")]
    Status(reqwest::StatusCode),
}

/// FCM gateway errors that mean the token is permanently dead and should be
/// dropped from the registry.
pub fn is_invalid_token(error: &str) -> bool {
    matches!(error, "NotRegistered" | "InvalidRegistration")
}

/// Outcome of one push attempt to one token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDelivery {
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-user fan-out result: one entry per registered token.
#[derive(Debug, Clone, Default)]
pub struct FanoutReport {
    pub results: Vec<TokenDelivery>,
}

impl FanoutReport {
    pub fn sent(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Partial success aggregates to overall success.
    pub fn success(&self) -> bool {
        self.sent() > 0
    }
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    success: i64,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    #[serde(default)]
    error: Option<String>,
}

/// Client for the FCM legacy HTTP API.
#[derive(Clone)]
pub struct PushClient {
    client: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl PushClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        server_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            server_key: server_key.into(),
        }
    }

    pub async fn send_to_token(
        &self,
        token: &str,
        payload: &NotificationPayload,
    ) -> Result<TokenDelivery, PushError> {
        let icon = payload.icon.as_deref().unwrap_or(DEFAULT_ICON);
        let body = json!({
            "to": token,
            "notification": {
                "title": payload.title,
                "body": payload.body,
                "icon": icon,
            },
            "data": payload.data,
            "webpush": {
                "headers": { "Urgency": "high" },
                "notification": {
                    "title": payload.title,
                    "body": payload.body,
                    "icon": icon,
                    "requireInteraction": true,
                },
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("key={}", self.server_key))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PushError::Status(response.status()));
        }

        let result: FcmResponse = response.json().await?;
        let error = result.results.first().and_then(|r| r.error.clone());
        Ok(TokenDelivery {
            token: token.to_string(),
            success: result.success == 1,
            error,
        })
    }

    /// Fan out to every token registered for a user. Tokens the gateway
    /// reports as permanently invalid are removed from the registry so later
    /// cycles stop retrying them; transport and store errors are recorded per
    /// token and never abort the fan-out.
    pub async fn send_to_user(
        &self,
        store: &dyn ReminderStore,
        user_id: &str,
        payload: &NotificationPayload,
    ) -> Result<FanoutReport, sqlx::Error> {
        let tokens = store.tokens_for_user(user_id).await?;
        if tokens.is_empty() {
            info!(user_id, "no device tokens registered");
            return Ok(FanoutReport::default());
        }

        let mut report = FanoutReport::default();
        for device in tokens {
            match self.send_to_token(&device.token, payload).await {
                Ok(delivery) => {
                    if let Some(error) = delivery.error.as_deref() {
                        if is_invalid_token(error) {
                            // A failed corrective delete only means the dead
                            // token is retried next cycle; remaining tokens
                            // still get this delivery.
                            match store.delete_token(&device.token).await {
                                Ok(_) => info!(user_id, error, "removed invalid device token"),
                                Err(err) => {
                                    warn!(user_id, error = %err, "failed to remove invalid token")
                                }
                            }
                        }
                    }
                    report.results.push(delivery);
                }
                Err(err) => {
                    warn!(user_id, error = %err, "push delivery failed");
                    report.results.push(TokenDelivery {
                        token: device.token,
                        success: false,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Ok(report)
    }
}
