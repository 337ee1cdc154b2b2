//! Errors surfaced by the HTTP boundary.
//!
//! Every failure is rendered as `{ "success": false, "error": <code>, "message": <text> }`.
//! Nothing is retried and nothing here is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::score_event::ScoreEventError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database not initialized: run the leaderboard migrations (DB_MIGRATE_ON_STARTUP=1)")]
    StoreUninitialized,

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::StoreUninitialized
            | ApiError::StoreUnavailable(_)
            | ApiError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::StoreUninitialized => "STORE_UNINITIALIZED",
            ApiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            ApiError::Unknown(_) => "UNKNOWN",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }
        let body = ErrorBody {
            success: false,
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Uninitialized => ApiError::StoreUninitialized,
            StoreError::Unavailable(e) => ApiError::StoreUnavailable(format!("Database unavailable: {e}")),
            StoreError::Query(e) => ApiError::Unknown(e.to_string()),
        }
    }
}

impl From<ScoreEventError> for ApiError {
    fn from(err: ScoreEventError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}
