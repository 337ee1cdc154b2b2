use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;

use super::{ScoreStore, StoreError};
use crate::models::leaderboard::{PurgeScope, RankedEntry, ScoreEntry};
use crate::models::score_event::ScoreUpdate;

/// SQLite-backed score store for local runs and tests.
///
/// `updated_at` is written by SQLite itself with millisecond precision.
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn upsert(&self, update: &ScoreUpdate) -> Result<ScoreEntry, StoreError> {
        let entry = sqlx::query_as::<_, ScoreEntry>(
            r#"
            INSERT INTO leaderboard (user_id, quiz_id, username, score, updated_at)
            VALUES (?, ?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT (user_id, quiz_id)
            DO UPDATE SET
                username = excluded.username,
                score = excluded.score,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            RETURNING user_id, quiz_id, username, score, updated_at
            "#,
        )
        .bind(&update.user_id)
        .bind(&update.quiz_id)
        .bind(&update.username)
        .bind(update.score)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn ranked(&self, quiz_id: &str, limit: i64) -> Result<Vec<RankedEntry>, StoreError> {
        let rows = sqlx::query_as::<_, RankedEntry>(
            r#"
            SELECT
                user_id,
                quiz_id,
                username,
                score,
                updated_at,
                ROW_NUMBER() OVER (ORDER BY score DESC, updated_at ASC, user_id ASC) AS rank
            FROM leaderboard
            WHERE quiz_id = ?
            ORDER BY score DESC, updated_at ASC, user_id ASC
            LIMIT ?
            "#,
        )
        .bind(quiz_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn last_update(&self, quiz_id: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
        let last = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(updated_at) FROM leaderboard WHERE quiz_id = ?",
        )
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(last)
    }

    async fn purge(&self, scope: &PurgeScope) -> Result<u64, StoreError> {
        let result = match scope {
            PurgeScope::Quiz(quiz_id) => {
                sqlx::query("DELETE FROM leaderboard WHERE quiz_id = ?")
                    .bind(quiz_id)
                    .execute(&self.pool)
                    .await?
            }
            PurgeScope::All => {
                sqlx::query("DELETE FROM leaderboard")
                    .execute(&self.pool)
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1 FROM leaderboard LIMIT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
