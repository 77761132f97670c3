use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::{ReadMode, StorageTx};

#[async_trait::async_trait]
pub trait SuggestionRepo: Send + Sync {
    /// Returns `false` when the (sender, recipient, card) triple already exists.
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion: &CardSuggestion,
    ) -> Result<bool, SuggestionError>;
    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
        mode: ReadMode,
    ) -> Result<Option<CardSuggestion>, SuggestionError>;
    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
    ) -> Result<bool, SuggestionError>;
    async fn delete_triple_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<bool, SuggestionError>;
    /// Oldest first.
    async fn list_for_recipient_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        recipient: UserId,
    ) -> Result<Vec<CardSuggestion>, SuggestionError>;
}
