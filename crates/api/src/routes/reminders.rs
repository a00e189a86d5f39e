use algobell_notify::dispatcher::ReminderDetail;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::state::{AppState, METRICS};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/reminders/scan", post(scan))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanResponse {
    success: bool,
    notifications_sent: usize,
    details: Vec<ReminderDetail>,
}

/// One reminder scan pass, invoked on a fixed external schedule. The scan
/// itself never fails; partial failures are reflected in the counts.
async fn scan(State(state): State<AppState>) -> Json<ScanResponse> {
    let report = state.dispatcher.run_scan().await;
    METRICS.record_notifications_sent(report.sent() as u64);

    Json(ScanResponse {
        success: true,
        notifications_sent: report.sent(),
        details: report.details,
    })
}
