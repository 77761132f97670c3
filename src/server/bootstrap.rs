use crate::domain_port::{TxManager, UserRepo};
use crate::logger::*;
use crate::settings::SeedUser;

/// Creates the configured users that do not exist yet. Returns how many were created.
pub async fn seed_users(
    tx_manager: &dyn TxManager,
    user_repo: &dyn UserRepo,
    users: &[SeedUser],
) -> anyhow::Result<usize> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut tx = tx_manager.begin().await?;
    let mut created = 0;
    for user in users {
        if user_repo
            .ensure_in_tx(&mut *tx, user.user_id, &user.username)
            .await?
        {
            debug!("seeded user {} ({})", user.username, user.user_id);
            created += 1;
        }
    }
    tx.commit().await?;

    info!("seed: {created} of {} user(s) created", users.len());
    Ok(created)
}
