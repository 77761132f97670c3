use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::{ReadMode, StorageTx};
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait FriendshipRepo: Send + Sync {
    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        mode: ReadMode,
    ) -> Result<Option<Friendship>, FriendshipError>;
    /// Fails with [`FriendshipError::AlreadyExists`] when the pair already has a row.
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        friendship: &Friendship,
    ) -> Result<(), FriendshipError>;
    async fn update_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError>;
    /// Returns whether a row was deleted.
    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<bool, FriendshipError>;
    /// Relationships of `user_id`, ordered by (updated_at DESC, other user DESC).
    async fn list_for_user_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_id: UserId,
        page_size: PageSize,
        after: Option<FriendCursor>,
    ) -> Result<Vec<FriendSummary>, FriendshipError>;
}
