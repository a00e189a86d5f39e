use std::net::SocketAddr;
use std::sync::Arc;

use algobell_core::clock::SystemClock;
use algobell_core::config::Settings;
use algobell_notify::dispatcher::Dispatcher;
use algobell_notify::push::PushClient;
use algobell_sources::aggregator::ContestAggregator;
use axum::middleware::from_fn;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;

mod error;
mod middleware;
mod routes;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let settings = Arc::new(Settings::from_env()?);

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let clock = Arc::new(SystemClock);
    let aggregator = Arc::new(ContestAggregator::from_settings(
        &settings,
        client.clone(),
        clock.clone(),
    ));
    let push = PushClient::new(client, settings.fcm_url.clone(), settings.fcm_server_key.clone());
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(db.clone()), push.clone(), clock));

    let state = AppState {
        db,
        settings: settings.clone(),
        aggregator,
        dispatcher,
        push,
    };

    let app = Router::new()
        .merge(routes::health_router(state.clone()))
        .merge(routes::v1_router(state))
        .layer(from_fn(middleware::metrics::metrics))
        .layer(from_fn(middleware::request_id::request_id));

    let addr: SocketAddr = settings.api_bind.parse()?;
    info!(%addr, env = %settings.algobell_env, "starting api");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
