use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::error::{ApiError, ErrorBody};
use crate::middleware::auth::require_webhook_secret;
use crate::models::leaderboard::{PurgeScope, RankedEntry, ScoreEntry};
use crate::models::score_event::ScoreEvent;
use crate::services::leaderboard_service::LeaderboardService;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Quiz to rank; `default` when omitted.
    quiz_id: Option<String>,
    /// Maximum rows returned (default 100, capped at 1000).
    #[serde(default, deserialize_with = "blank_as_none")]
    #[param(value_type = Option<i64>)]
    limit: Option<i64>,
}

/// `?limit=` counts as absent; anything else must parse as an integer.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("limit: cannot parse integer from {raw:?}"))),
        _ => Ok(None),
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuizQuery {
    quiz_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateScoreResponse {
    pub success: bool,
    pub message: String,
    pub data: ScoreEntry,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<RankedEntry>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TimestampResponse {
    pub success: bool,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
    /// `null` when every quiz was cleared.
    pub quiz_id: Option<String>,
}

fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::InvalidRequest(rejection.body_text())
}

#[utoipa::path(
    post,
    path = "/update-score",
    request_body = ScoreEvent,
    responses(
        (status = 200, description = "Score stored", body = UpdateScoreResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody),
        (status = 401, description = "Webhook secret mismatch", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    security(("webhook_secret" = []))
)]
pub async fn update_score(
    State(service): State<Arc<LeaderboardService>>,
    payload: Result<Json<ScoreEvent>, JsonRejection>,
) -> Result<Json<UpdateScoreResponse>, ApiError> {
    let Json(event) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let entry = service.update_score(event).await?;

    Ok(Json(UpdateScoreResponse {
        success: true,
        message: "Score updated successfully".to_string(),
        data: entry,
    }))
}

#[utoipa::path(
    get,
    path = "/update-score",
    responses((status = 200, description = "Describes the webhook payload"))
)]
pub async fn update_score_info() -> Json<Value> {
    Json(json!({
        "message": "Score webhook receiver is running",
        "endpoint": "POST /update-score",
        "expectedPayload": {
            "user_id": "string",
            "external_id": "string (optional, preferred over user_id)",
            "username": "string",
            "score": "number",
            "quiz_id": "string (optional, defaults to \"default\")"
        }
    }))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Ranked entries of the quiz", body = LeaderboardResponse),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn get_leaderboard(
    State(service): State<Arc<LeaderboardService>>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let Query(query) = query.map_err(bad_query)?;
    let data = service
        .get_leaderboard(query.quiz_id.as_deref(), query.limit)
        .await?;

    Ok(Json(LeaderboardResponse {
        success: true,
        count: data.len(),
        data,
        timestamp: Utc::now(),
    }))
}

#[utoipa::path(
    get,
    path = "/leaderboard-timestamp",
    params(QuizQuery),
    responses(
        (status = 200, description = "Latest modification time of the quiz", body = TimestampResponse),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn leaderboard_timestamp(
    State(service): State<Arc<LeaderboardService>>,
    query: Result<Query<QuizQuery>, QueryRejection>,
) -> Result<Json<TimestampResponse>, ApiError> {
    let Query(query) = query.map_err(bad_query)?;
    let last_update = service.last_update(query.quiz_id.as_deref()).await?;

    Ok(Json(TimestampResponse {
        success: true,
        last_update,
    }))
}

#[utoipa::path(
    delete,
    path = "/clear-leaderboard",
    params(QuizQuery),
    responses(
        (status = 200, description = "Entries deleted; without quiz_id every quiz is cleared", body = ClearResponse),
        (status = 400, description = "Blank quiz_id", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn clear_leaderboard(
    State(service): State<Arc<LeaderboardService>>,
    query: Result<Query<QuizQuery>, QueryRejection>,
) -> Result<Json<ClearResponse>, ApiError> {
    let Query(query) = query.map_err(bad_query)?;
    let scope = match query.quiz_id.as_deref().map(str::trim) {
        None => PurgeScope::All,
        Some("") => {
            return Err(ApiError::InvalidRequest(
                "quiz_id must not be blank; omit it to clear every quiz".into(),
            ))
        }
        Some(id) => PurgeScope::Quiz(id.to_string()),
    };

    let deleted_count = service.clear(scope.clone()).await?;

    Ok(Json(ClearResponse {
        success: true,
        message: "Leaderboard cleared successfully".to_string(),
        deleted_count,
        quiz_id: scope.quiz_id().map(str::to_string),
    }))
}

#[utoipa::path(
    get,
    path = "/clear-leaderboard",
    responses((status = 200, description = "Reminds callers to use DELETE"))
)]
pub async fn clear_leaderboard_info() -> Json<Value> {
    Json(json!({
        "message": "Use DELETE method to clear the leaderboard",
        "warning": "Without quiz_id this deletes ALL entries of every quiz permanently!"
    }))
}

pub fn leaderboard_routes(service: Arc<LeaderboardService>, config: Arc<Config>) -> Router {
    // only the webhook write is guarded; the info GET added afterwards stays open
    let update = post(update_score)
        .route_layer(from_fn_with_state(config, require_webhook_secret))
        .get(update_score_info);

    Router::new()
        .route("/update-score", update)
        .route("/leaderboard", get(get_leaderboard))
        .route("/leaderboard-timestamp", get(leaderboard_timestamp))
        .route(
            "/clear-leaderboard",
            get(clear_leaderboard_info).delete(clear_leaderboard),
        )
        .with_state(service)
}
