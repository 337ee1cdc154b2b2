//! Score Store: the persisted table of current scores per (user, quiz).
//!
//! All coordination between concurrent writers is delegated to the database's
//! `INSERT ... ON CONFLICT` on the `(user_id, quiz_id)` unique key. Timestamps
//! come from the database clock, never from the application.

mod postgres;
mod sqlite;

pub use postgres::PgScoreStore;
pub use sqlite::SqliteScoreStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::leaderboard::{PurgeScope, RankedEntry, ScoreEntry};
use crate::models::score_event::ScoreUpdate;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The leaderboard table does not exist yet.
    #[error("leaderboard table is missing")]
    Uninitialized,

    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if is_missing_table(db.code().as_deref(), db.message()) => {
                StoreError::Uninitialized
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            _ => StoreError::Query(err),
        }
    }
}

/// Postgres reports `undefined_table` as SQLSTATE 42P01; SQLite only says so in the message.
fn is_missing_table(code: Option<&str>, message: &str) -> bool {
    code == Some("42P01") || message.contains("no such table") || message.contains("does not exist")
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Inserts or replaces the entry for `(user_id, quiz_id)` in one statement
    /// and returns the row as written.
    async fn upsert(&self, update: &ScoreUpdate) -> Result<ScoreEntry, StoreError>;

    /// Entries of one quiz ordered by score desc, then earliest `updated_at`,
    /// numbered from 1 and cut to `limit` rows.
    async fn ranked(&self, quiz_id: &str, limit: i64) -> Result<Vec<RankedEntry>, StoreError>;

    /// Latest `updated_at` in the quiz, `None` when it has no entries.
    async fn last_update(&self, quiz_id: &str) -> Result<Option<DateTime<Utc>>, StoreError>;

    /// Deletes every entry in scope and returns how many were removed.
    async fn purge(&self, scope: &PurgeScope) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
