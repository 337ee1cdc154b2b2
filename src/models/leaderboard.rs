use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quiz used when an event or query does not name one.
pub const DEFAULT_QUIZ_ID: &str = "default";

/// Current best-known score of one participant in one quiz.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema, sqlx::FromRow)]
pub struct ScoreEntry {
    pub user_id: String,
    pub quiz_id: String,
    pub username: String,
    pub score: f64,
    pub updated_at: DateTime<Utc>,
}

/// A leaderboard row: the entry plus its 1-based position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema, sqlx::FromRow)]
pub struct RankedEntry {
    pub rank: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entry: ScoreEntry,
}

/// Rows targeted by a purge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeScope {
    Quiz(String),
    All,
}

impl PurgeScope {
    pub fn quiz_id(&self) -> Option<&str> {
        match self {
            PurgeScope::Quiz(id) => Some(id),
            PurgeScope::All => None,
        }
    }
}

/// Resolves an optional query parameter to a quiz id, blank meaning the default quiz.
pub fn resolve_quiz_id(quiz_id: Option<&str>) -> String {
    match quiz_id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => DEFAULT_QUIZ_ID.to_string(),
    }
}
