use crate::application_port::CardError;
use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum SuggestionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("user not found")]
    UserNotFound,
    #[error("card not found")]
    CardNotFound,
    #[error("suggestion not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(String),
}

impl From<CardError> for SuggestionError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::InvalidArgument(e) => SuggestionError::InvalidArgument(e),
            CardError::NotFound => SuggestionError::CardNotFound,
            CardError::Store(e) => SuggestionError::Store(e),
        }
    }
}

#[async_trait::async_trait]
pub trait SuggestionService: Send + Sync {
    /// Offers `card_id` to `recipient`. Returns `false` if the same offer is already pending.
    async fn suggest_card(
        &self,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<bool, SuggestionError>;
    async fn list_suggestions(
        &self,
        recipient: UserId,
    ) -> Result<Vec<SuggestedCard>, SuggestionError>;
    /// Copies the suggested card into the recipient's collection and consumes the suggestion.
    async fn accept_suggestion(
        &self,
        suggestion_id: SuggestionId,
        recipient: UserId,
    ) -> Result<CardId, SuggestionError>;
    async fn decline_suggestion(
        &self,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<(), SuggestionError>;
}
