use super::store::state;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryUserRepo;

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn ensure_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
    ) -> anyhow::Result<bool> {
        let users = &mut state(tx).users;
        if users.contains_key(&user_id) {
            return Ok(false);
        }
        if users.values().any(|u| u.username == username) {
            anyhow::bail!("username {username} is taken");
        }

        users.insert(
            user_id,
            UserRecord {
                user_id,
                username: username.to_owned(),
                friend_requests_blocked: false,
                created_at: chrono::Utc::now(),
            },
        );
        Ok(true)
    }

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> anyhow::Result<Option<UserRecord>> {
        Ok(state(tx).users.get(&user_id).cloned())
    }

    async fn set_friend_requests_blocked_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        blocked: bool,
    ) -> anyhow::Result<bool> {
        match state(tx).users.get_mut(&user_id) {
            Some(user) => {
                user.friend_requests_blocked = blocked;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
