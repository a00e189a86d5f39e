use algobell_core::types::{time_until_start, Contest};
use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/contests", get(list_contests))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContestListResponse {
    success: bool,
    data: Vec<ContestItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContestItem {
    #[serde(flatten)]
    contest: Contest,
    time_until_start: String,
}

/// Aggregated cross-platform listing. A failing upstream platform only
/// shrinks the list; this endpoint itself never fails because of one.
async fn list_contests(State(state): State<AppState>) -> Json<ContestListResponse> {
    let contests = state.aggregator.fetch_all().await;
    let now = Utc::now();

    let data = contests
        .into_iter()
        .map(|contest| ContestItem {
            time_until_start: time_until_start(contest.start_time, now),
            contest,
        })
        .collect();

    Json(ContestListResponse {
        success: true,
        data,
    })
}
