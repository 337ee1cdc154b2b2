use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::leaderboard::{resolve_quiz_id, PurgeScope, RankedEntry, ScoreEntry};
use crate::models::score_event::ScoreEvent;
use crate::store::ScoreStore;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store }
    }

    /// Validates a webhook event and merges it into the store (last write wins).
    pub async fn update_score(&self, event: ScoreEvent) -> Result<ScoreEntry, ApiError> {
        let update = event.normalize()?;
        let entry = self.store.upsert(&update).await?;

        info!(
            user_id = %entry.user_id,
            quiz_id = %entry.quiz_id,
            score = entry.score,
            "Score updated for {}",
            entry.username
        );
        Ok(entry)
    }

    pub async fn get_leaderboard(
        &self,
        quiz_id: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<RankedEntry>, ApiError> {
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(n) if n < 1 => {
                return Err(ApiError::InvalidRequest("limit must be a positive integer".into()))
            }
            Some(n) => n.min(MAX_LIMIT),
        };

        Ok(self.store.ranked(&resolve_quiz_id(quiz_id), limit).await?)
    }

    pub async fn last_update(&self, quiz_id: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
        Ok(self.store.last_update(&resolve_quiz_id(quiz_id)).await?)
    }

    pub async fn clear(&self, scope: PurgeScope) -> Result<u64, ApiError> {
        let deleted = self.store.purge(&scope).await?;
        match scope.quiz_id() {
            Some(quiz_id) => warn!(quiz_id, deleted, "Cleared leaderboard"),
            None => warn!(deleted, "Cleared every leaderboard"),
        }
        Ok(deleted)
    }

    pub async fn ping(&self) -> Result<(), ApiError> {
        Ok(self.store.ping().await?)
    }
}
