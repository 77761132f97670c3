use crate::application_impl::db_now;
use crate::application_port::{FriendshipError, FriendshipService};
use crate::domain_model::*;
use crate::domain_port::{FriendshipRepo, ReadMode, TxManager, UserRepo};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RealFriendshipService {
    user_repo: Arc<dyn UserRepo>,
    friendship_repo: Arc<dyn FriendshipRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealFriendshipService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        friendship_repo: Arc<dyn FriendshipRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            user_repo,
            friendship_repo,
            tx_manager,
        }
    }

    /// Cancel, reject, unfriend and unblock all end the relationship by deleting its row.
    async fn remove(
        &self,
        me: UserId,
        other: UserId,
        action: FriendshipAction,
    ) -> Result<(), FriendshipError> {
        ensure_distinct(me, other)?;
        let pair = UserPair::new(me, other);

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        if !self.friendship_repo.delete_in_tx(&mut *tx, pair).await? {
            return Err(FriendshipError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        info!("friendship {me} <-> {other} removed ({action:?})");
        Ok(())
    }
}

fn ensure_distinct(me: UserId, other: UserId) -> Result<(), FriendshipError> {
    if me == other {
        return Err(FriendshipError::InvalidArgument(
            "initiator and counterpart are the same user".to_string(),
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl FriendshipService for RealFriendshipService {
    async fn request(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError> {
        ensure_distinct(me, other)?;
        let pair = UserPair::new(me, other);

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        if let Some(existing) = self
            .friendship_repo
            .get_in_tx(&mut *tx, pair, ReadMode::Plain)
            .await?
        {
            if existing.who_denies_friendship() == Some(other) {
                debug!("request {me} -> {other} refused: blocked by counterpart");
                return Err(FriendshipError::NotAllowed(
                    "user limited your ability to send requests".to_string(),
                ));
            }
            return Err(FriendshipError::AlreadyExists);
        }

        let counterpart = self
            .user_repo
            .get_in_tx(&mut *tx, other)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?
            .ok_or(FriendshipError::UserNotFound)?;
        if counterpart.friend_requests_blocked {
            debug!("request {me} -> {other} refused: requests disabled");
            return Err(FriendshipError::NotAllowed(
                "user doesn't accept friend requests".to_string(),
            ));
        }

        // a concurrent request for the same pair loses on the unique key here
        let friendship = Friendship::new_request(me, other, db_now());
        self.friendship_repo
            .insert_in_tx(&mut *tx, &friendship)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        info!("friend request {me} -> {other} created");
        Ok(friendship)
    }

    async fn accept(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError> {
        ensure_distinct(me, other)?;
        let pair = UserPair::new(me, other);

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let mut friendship = self
            .friendship_repo
            .get_in_tx(&mut *tx, pair, ReadMode::ForUpdate)
            .await?
            .ok_or(FriendshipError::NotFound)?;
        if friendship.status != FriendshipStatus::Pending {
            return Err(FriendshipError::InvalidState(friendship.status));
        }
        // only the requestee holds a request to accept
        if friendship.requestee != me {
            return Err(FriendshipError::NotFound);
        }

        friendship.status = FriendshipStatus::Friends;
        friendship.updated_at = db_now();
        self.friendship_repo
            .update_status_in_tx(&mut *tx, pair, friendship.status, friendship.updated_at)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        info!("friend request {other} -> {me} accepted");
        Ok(friendship)
    }

    async fn block(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError> {
        ensure_distinct(me, other)?;
        let pair = UserPair::new(me, other);

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let mut friendship = self
            .friendship_repo
            .get_in_tx(&mut *tx, pair, ReadMode::ForUpdate)
            .await?
            .ok_or(FriendshipError::NotFound)?;
        if !matches!(
            friendship.status,
            FriendshipStatus::Pending | FriendshipStatus::Friends
        ) {
            return Err(FriendshipError::InvalidState(friendship.status));
        }

        let by = friendship.role_of(me).ok_or(FriendshipError::NotFound)?;
        friendship.status = FriendshipStatus::Blocked { by };
        friendship.updated_at = db_now();
        self.friendship_repo
            .update_status_in_tx(&mut *tx, pair, friendship.status, friendship.updated_at)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        info!("user {me} blocked {other}");
        Ok(friendship)
    }

    async fn cancel(&self, me: UserId, other: UserId) -> Result<(), FriendshipError> {
        self.remove(me, other, FriendshipAction::Cancel).await
    }

    async fn reject(&self, me: UserId, other: UserId) -> Result<(), FriendshipError> {
        self.remove(me, other, FriendshipAction::Reject).await
    }

    async fn unfriend(&self, me: UserId, other: UserId) -> Result<(), FriendshipError> {
        self.remove(me, other, FriendshipAction::Unfriend).await
    }

    async fn unblock(&self, me: UserId, other: UserId) -> Result<(), FriendshipError> {
        self.remove(me, other, FriendshipAction::Unblock).await
    }

    async fn manage(
        &self,
        me: UserId,
        other: UserId,
        action: FriendshipAction,
    ) -> Result<Option<Friendship>, FriendshipError> {
        match action {
            FriendshipAction::Request => self.request(me, other).await.map(Some),
            FriendshipAction::Accept => self.accept(me, other).await.map(Some),
            FriendshipAction::Block => self.block(me, other).await.map(Some),
            FriendshipAction::Cancel
            | FriendshipAction::Reject
            | FriendshipAction::Unfriend
            | FriendshipAction::Unblock => self.remove(me, other, action).await.map(|_| None),
        }
    }

    async fn get_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, FriendshipError> {
        ensure_distinct(a, b)?;

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let friendship = self
            .friendship_repo
            .get_in_tx(&mut *tx, UserPair::new(a, b), ReadMode::Plain)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        Ok(friendship)
    }

    async fn list_friends(
        &self,
        user_id: UserId,
        page_size: PageSize,
        after: Option<FriendCursor>,
    ) -> Result<Vec<FriendSummary>, FriendshipError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let friends = self
            .friendship_repo
            .list_for_user_in_tx(&mut *tx, user_id, page_size.clamped(), after)
            .await?;

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        Ok(friends)
    }

    async fn set_friend_requests_blocked(
        &self,
        user_id: UserId,
        blocked: bool,
    ) -> Result<(), FriendshipError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        let found = self
            .user_repo
            .set_friend_requests_blocked_in_tx(&mut *tx, user_id, blocked)
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;
        if !found {
            return Err(FriendshipError::UserNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| FriendshipError::Store(e.to_string()))?;

        info!("user {user_id} friend requests blocked = {blocked}");
        Ok(())
    }
}
