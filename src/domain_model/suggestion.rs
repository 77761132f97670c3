use crate::domain_model::{CardAggregate, CardId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SuggestionId(pub uuid::Uuid);

impl SuggestionId {
    pub fn new() -> Self {
        SuggestionId(uuid::Uuid::new_v4())
    }
}

impl Default for SuggestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SuggestionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(SuggestionId)
    }
}

/// An offer from `sender` to copy `card_id` into `recipient`'s collection.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CardSuggestion {
    pub suggestion_id: SuggestionId,
    pub sender: UserId,
    pub recipient: UserId,
    pub card_id: CardId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestedCard {
    pub suggestion: CardSuggestion,
    pub card: CardAggregate,
}
