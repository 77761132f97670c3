use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts the user unless the id already exists. Returns whether a row was written.
    async fn ensure_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
    ) -> anyhow::Result<bool>;

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> anyhow::Result<Option<UserRecord>>;

    /// Returns `false` when the user does not exist.
    async fn set_friend_requests_blocked_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        blocked: bool,
    ) -> anyhow::Result<bool>;
}
