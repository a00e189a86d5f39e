use std::sync::Arc;
use std::time::Duration;

use algobell_core::clock::SystemClock;
use algobell_core::config::Settings;
use algobell_notify::dispatcher::Dispatcher;
use algobell_notify::push::PushClient;
use sqlx::postgres::PgPoolOptions;
use tokio::time::MissedTickBehavior;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let settings = Settings::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let push = PushClient::new(client, settings.fcm_url.clone(), settings.fcm_server_key.clone());
    let dispatcher = Dispatcher::new(Arc::new(db), push, Arc::new(SystemClock));

    info!(
        interval_secs = settings.scan_interval_secs,
        "reminder worker starting"
    );

    // Stateless scans on a fixed cadence; all coordination lives in the
    // durable stores, so a slow or failed cycle never poisons the next one.
    let mut interval = tokio::time::interval(Duration::from_secs(settings.scan_interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let report = dispatcher.run_scan().await;
        for detail in &report.details {
            info!(
                user_id = %detail.user_id,
                contest = %detail.contest_name,
                offset = %detail.offset,
                "reminder delivered"
            );
        }
    }
}
