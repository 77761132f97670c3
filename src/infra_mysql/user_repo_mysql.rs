use super::util::downcast;
use crate::domain_model::*;
use crate::domain_port::*;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::Row;

pub struct MySqlUserRepo;

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn ensure_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        username: &str,
    ) -> anyhow::Result<bool> {
        let tx = downcast(tx);

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(tx.conn())
            .await
            .map_err(|e| anyhow!("query user: {e}"))?;
        if existing > 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
INSERT INTO user (user_id, username, friend_requests_blocked, created_at)
VALUES (?, ?, FALSE, ?)
"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(crate::application_impl::db_now())
        .execute(tx.conn())
        .await
        .map_err(|e| anyhow!("insert user: {e}"))?;

        Ok(true)
    }

    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> anyhow::Result<Option<UserRecord>> {
        let tx = downcast(tx);

        let Some(row) = sqlx::query(
            r#"
SELECT user_id, username, friend_requests_blocked, created_at
FROM user
WHERE user_id = ?
"#,
        )
        .bind(user_id)
        .fetch_optional(tx.conn())
        .await
        .map_err(|e| anyhow!("query user: {e}"))?
        else {
            return Ok(None);
        };

        Ok(Some(UserRecord {
            user_id: row.try_get::<UserId, _>("user_id")?,
            username: row.try_get::<String, _>("username")?,
            friend_requests_blocked: row.try_get::<bool, _>("friend_requests_blocked")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        }))
    }

    async fn set_friend_requests_blocked_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        blocked: bool,
    ) -> anyhow::Result<bool> {
        let tx = downcast(tx);

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM user WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(tx.conn())
            .await
            .map_err(|e| anyhow!("query user: {e}"))?;
        if exists == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE user SET friend_requests_blocked = ? WHERE user_id = ?")
            .bind(blocked)
            .bind(user_id)
            .execute(tx.conn())
            .await
            .map_err(|e| anyhow!("update user: {e}"))?;

        Ok(true)
    }
}
