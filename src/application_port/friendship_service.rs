use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("user not found")]
    UserNotFound,
    #[error("friendship not found")]
    NotFound,
    #[error("friendship already exists")]
    AlreadyExists,
    #[error("action not valid while friendship is {0}")]
    InvalidState(FriendshipStatus),
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("store error: {0}")]
    Store(String),
}

#[async_trait::async_trait]
pub trait FriendshipService: Send + Sync {
    /// Creates a pending request from `me` to `other`.
    async fn request(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError>;
    /// Accepts the pending request `other` sent to `me`.
    async fn accept(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError>;
    async fn block(&self, me: UserId, other: UserId) -> Result<Friendship, FriendshipError>;
    async fn cancel(&self, me: UserId, other: UserId) -> Result<(), FriendshipError>;
    async fn reject(&self, me: UserId, other: UserId) -> Result<(), FriendshipError>;
    async fn unfriend(&self, me: UserId, other: UserId) -> Result<(), FriendshipError>;
    async fn unblock(&self, me: UserId, other: UserId) -> Result<(), FriendshipError>;

    /// Applies `action`. Returns the surviving row, or `None` when the action deletes it.
    async fn manage(
        &self,
        me: UserId,
        other: UserId,
        action: FriendshipAction,
    ) -> Result<Option<Friendship>, FriendshipError>;

    async fn get_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, FriendshipError>;
    async fn list_friends(
        &self,
        user_id: UserId,
        page_size: PageSize,
        after: Option<FriendCursor>,
    ) -> Result<Vec<FriendSummary>, FriendshipError>;
    async fn set_friend_requests_blocked(
        &self,
        user_id: UserId,
        blocked: bool,
    ) -> Result<(), FriendshipError>;
}
