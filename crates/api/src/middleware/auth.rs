use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{
    error::{ApiError, AppError},
    state::{AppState, RequestId},
};

/// User identity established by the upstream auth gateway, which verifies
/// the session and forwards the user id.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

const USER_ID_HEADER: &str = "X-User-Id";

/// Guard for user-owned resources: requires the gateway-installed identity
/// header and exposes it as an [`AuthContext`] extension.
pub async fn user_auth(mut req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let request_id = extract_request_id(&req);

    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized.with_request_id(&request_id))?
        .to_string();

    req.extensions_mut().insert(AuthContext { user_id });
    Ok(next.run(req).await)
}

/// Guard for internal endpoints (reminder scan, push send): requires the
/// configured service key as a bearer token, compared in constant time.
pub async fn service_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = extract_request_id(&req);

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(parse_bearer)
        .ok_or_else(|| AppError::Unauthorized.with_request_id(&request_id))?;

    let presented = Sha256::digest(token.as_bytes());
    let expected = Sha256::digest(state.settings.service_key.as_bytes());
    if !bool::from(presented.as_slice().ct_eq(expected.as_slice())) {
        return Err(AppError::Unauthorized.with_request_id(&request_id));
    }

    Ok(next.run(req).await)
}

fn parse_bearer(value: &HeaderValue) -> Option<&str> {
    value
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn extract_request_id(req: &Request<Body>) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}
