use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Shared tag dictionary plus the card-tag join rows.
#[async_trait::async_trait]
pub trait TagRepo: Send + Sync {
    /// Returns the tag with this normalized text, creating it if needed.
    async fn find_or_create_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Tag, CardError>;
    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Option<Tag>, CardError>;

    async fn list_for_card_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Tag>, CardError>;
    /// Distinct tags linked to any card owned by `owner`, in text order.
    async fn list_for_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
    ) -> Result<Vec<Tag>, CardError>;
    async fn cards_with_tag_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        tag_id: TagId,
    ) -> Result<Vec<CardId>, CardError>;
    async fn link_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
        created_by: UserId,
    ) -> Result<(), CardError>;
    /// Removes the join row only; the tag itself stays in the dictionary.
    async fn unlink_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
    ) -> Result<(), CardError>;
}
