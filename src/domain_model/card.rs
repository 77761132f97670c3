use crate::domain_model::{Line, Tag, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Ord,
            PartialOrd,
            Eq,
            PartialEq,
            Hash,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::from_str(s).map($name)
            }
        }
    };
}

uuid_id!(CardId);
uuid_id!(ExampleId);
uuid_id!(TranslationId);

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExampleBody {
    pub example: String,
    pub translation: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Example {
    pub example_id: ExampleId,
    #[serde(flatten)]
    pub body: ExampleBody,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Translation {
    pub translation_id: TranslationId,
    pub text: String,
}

/// Scalar columns of a card row.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CardRecord {
    pub card_id: CardId,
    pub owner: UserId,
    pub entry: String,
    pub notes: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A card with its owned collections loaded.
#[derive(Debug, Clone, Serialize)]
pub struct CardAggregate {
    #[serde(flatten)]
    pub card: CardRecord,
    pub examples: Vec<Example>,
    pub translations: Vec<Translation>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDraft {
    pub entry: String,
    pub notes: Option<String>,
    pub language: String,
    pub examples: Vec<ExampleBody>,
    pub translations: Vec<String>,
    pub tags: Vec<String>,
}

/// Desired state of an existing card. Lines without an id are new.
#[derive(Debug, Clone, Deserialize)]
pub struct CardUpdate {
    pub card_id: CardId,
    pub entry: String,
    pub notes: Option<String>,
    pub language: String,
    pub examples: Vec<Line<ExampleId, ExampleBody>>,
    pub translations: Vec<Line<TranslationId, String>>,
    pub tags: Vec<String>,
}
