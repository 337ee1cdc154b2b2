use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::Config;
use crate::error::ApiError;
use crate::utils::bearer_matches;

/// Middleware for `middleware::from_fn_with_state`.
/// - No `WEBHOOK_SECRET` configured: every request passes.
/// - Otherwise `Authorization` must be exactly `Bearer <secret>`; anything else is a 401
///   and the wrapped handler never runs.
pub async fn require_webhook_secret(
    State(config): State<Arc<Config>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = config.webhook_secret.as_deref() else {
        return Ok(next.run(req).await);
    };

    let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if !bearer_matches(header, secret) {
        tracing::warn!("Rejected score webhook with a missing or wrong secret");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}
