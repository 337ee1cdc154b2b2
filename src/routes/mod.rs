use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{config, error::ApiError, services::leaderboard_service::LeaderboardService};

pub mod leaderboard;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check OK")
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}

#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "Store reachable and migrated"),
        (status = 500, description = "Store unavailable or not initialized")
    )
)]
pub async fn readiness_check(
    State(service): State<Arc<LeaderboardService>>,
) -> Result<Json<Value>, ApiError> {
    service.ping().await?;
    Ok(Json(json!({ "status": "ready", "database": "connected" })))
}

pub fn init_routes(service: Arc<LeaderboardService>, config: Arc<config::Config>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check).with_state(service.clone()))
        .merge(leaderboard::leaderboard_routes(service, config))
}
