use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::leaderboard::DEFAULT_QUIZ_ID;
use crate::utils::{coerce_score, identifier};

/// Raw webhook payload as posted by the marketing platform.
///
/// Fields stay untyped until [`ScoreEvent::normalize`] so that a string score
/// or a numeric id is coerced rather than rejected by the JSON extractor.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct ScoreEvent {
    #[schema(value_type = Option<String>)]
    pub user_id: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub external_id: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub username: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub score: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub quiz_id: Option<Value>,
}

/// A validated score event, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreUpdate {
    pub user_id: String,
    pub quiz_id: String,
    pub username: String,
    pub score: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreEventError {
    #[error("Missing required fields: username and score are required")]
    MissingFields,
    #[error("Missing user identifier: user_id or external_id required")]
    MissingUserId,
    #[error("Invalid score value")]
    InvalidScore,
}

impl ScoreEvent {
    pub fn normalize(&self) -> Result<ScoreUpdate, ScoreEventError> {
        let username =
            identifier(self.username.as_ref()).ok_or(ScoreEventError::MissingFields)?;
        let score = match &self.score {
            None | Some(Value::Null) => return Err(ScoreEventError::MissingFields),
            Some(raw) => raw,
        };

        let user_id = identifier(self.external_id.as_ref())
            .or_else(|| identifier(self.user_id.as_ref()))
            .ok_or(ScoreEventError::MissingUserId)?;
        let quiz_id =
            identifier(self.quiz_id.as_ref()).unwrap_or_else(|| DEFAULT_QUIZ_ID.to_string());
        let score = coerce_score(score).ok_or(ScoreEventError::InvalidScore)?;

        Ok(ScoreUpdate {
            user_id,
            quiz_id,
            username,
            score,
        })
    }
}
