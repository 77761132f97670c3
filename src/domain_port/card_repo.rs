use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::{ReadMode, StorageTx};

#[async_trait::async_trait]
pub trait CardRepo: Send + Sync {
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError>;
    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        mode: ReadMode,
    ) -> Result<Option<CardRecord>, CardError>;
    /// Overwrites entry, notes, language and updated_at.
    async fn update_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError>;
    /// Deletes the card; owned lines, tag links and suggestions go with it.
    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<bool, CardError>;
    /// Cards of `owner`, newest first. `entry_like` is a lowercase substring filter.
    async fn list_by_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        entry_like: Option<&str>,
    ) -> Result<Vec<CardRecord>, CardError>;
}
