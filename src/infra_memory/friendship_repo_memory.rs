use super::store::state;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};

pub struct MemoryFriendshipRepo;

#[async_trait::async_trait]
impl FriendshipRepo for MemoryFriendshipRepo {
    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        _mode: ReadMode,
    ) -> Result<Option<Friendship>, FriendshipError> {
        Ok(state(tx).friendships.get(&pair).cloned())
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        friendship: &Friendship,
    ) -> Result<(), FriendshipError> {
        let friendships = &mut state(tx).friendships;
        if friendships.contains_key(&friendship.pair()) {
            return Err(FriendshipError::AlreadyExists);
        }
        friendships.insert(friendship.pair(), friendship.clone());
        Ok(())
    }

    async fn update_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError> {
        let friendship = state(tx)
            .friendships
            .get_mut(&pair)
            .ok_or(FriendshipError::NotFound)?;
        friendship.status = status;
        friendship.updated_at = updated_at;
        Ok(())
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<bool, FriendshipError> {
        Ok(state(tx).friendships.remove(&pair).is_some())
    }

    async fn list_for_user_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_id: UserId,
        page_size: PageSize,
        after: Option<FriendCursor>,
    ) -> Result<Vec<FriendSummary>, FriendshipError> {
        let state = state(tx);

        let mut friends: Vec<FriendSummary> = state
            .friendships
            .values()
            .filter_map(|f| {
                let other = f.pair().other(user_id)?;
                let username = state
                    .users
                    .get(&other)
                    .map(|u| u.username.clone())
                    .unwrap_or_default();
                Some(FriendSummary {
                    user_id: other,
                    username,
                    status: f.status,
                    is_requester: f.requester == other,
                    since: f.updated_at,
                })
            })
            .filter(|s| after.is_none_or(|cur| cur.precedes(s.since, s.user_id)))
            .collect();

        friends.sort_by(|a, b| b.cursor().cmp(&a.cursor()));
        friends.truncate(page_size.0 as usize);
        Ok(friends)
    }
}
