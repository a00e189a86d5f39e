pub mod contests;
pub mod devices;
pub mod health;
pub mod notifications;
pub mod preferences;
pub mod reminders;
pub mod subscriptions;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

use crate::middleware::auth::{service_auth, user_auth};
use crate::state::AppState;

pub fn v1_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .merge(subscriptions::router(state.clone()))
        .merge(preferences::router(state.clone()))
        .merge(devices::router(state.clone()))
        .layer(from_fn(user_auth));

    let service_routes = Router::new()
        .merge(notifications::router(state.clone()))
        .merge(reminders::router(state.clone()))
        .layer(from_fn_with_state(state.clone(), service_auth));

    Router::new()
        .merge(contests::router(state))
        .merge(user_routes)
        .merge(service_routes)
}

pub fn health_router(state: AppState) -> Router {
    health::router(state)
}
