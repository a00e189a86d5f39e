use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::state::METRICS;

pub async fn metrics(req: Request<Body>, next: Next) -> Response {
    let resp = next.run(req).await;
    METRICS.record_http_request(resp.status().as_u16());
    resp
}
