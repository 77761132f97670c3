use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("card not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(String),
}

impl From<PlanError> for CardError {
    fn from(err: PlanError) -> Self {
        CardError::InvalidArgument(err.to_string())
    }
}

impl From<TagTextError> for CardError {
    fn from(err: TagTextError) -> Self {
        CardError::InvalidArgument(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CardService: Send + Sync {
    async fn create_card(&self, owner: UserId, draft: CardDraft) -> Result<CardId, CardError>;
    async fn get_card(&self, owner: UserId, card_id: CardId) -> Result<CardAggregate, CardError>;
    async fn list_cards(&self, owner: UserId) -> Result<Vec<CardAggregate>, CardError>;
    /// Case-insensitive substring search on the entry.
    async fn search_cards(
        &self,
        owner: UserId,
        fragment: &str,
    ) -> Result<Vec<CardAggregate>, CardError>;
    /// Brings the card and its owned collections to the desired state.
    async fn update_card(
        &self,
        owner: UserId,
        update: CardUpdate,
    ) -> Result<ReconcileReport, CardError>;
    async fn delete_card(&self, owner: UserId, card_id: CardId) -> Result<(), CardError>;

    /// Distinct tags on the owner's cards, in text order.
    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>, CardError>;
    /// Moves every one of the owner's cards tagged `from` onto `to`, creating
    /// `to` if needed. Returns how many cards were relinked.
    async fn rename_tag(&self, owner: UserId, from: &str, to: &str) -> Result<usize, CardError>;
}
