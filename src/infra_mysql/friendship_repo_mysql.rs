use super::util::{downcast, is_dup_key, lock_clause};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::mysql::MySqlRow;
use sqlx::{Database, Decode, Encode, Row, Type};

// stored as the `as_str` form, e.g. 'blocked_by_requestee'
impl<'r, DB: Database> Decode<'r, DB> for FriendshipStatus
where
    &'r str: Decode<'r, DB>,
{
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let s = <&str as Decode<DB>>::decode(value)?;
        Ok(s.parse()?)
    }
}

impl<'q, DB: Database> Encode<'q, DB> for FriendshipStatus
where
    String: Encode<'q, DB>,
{
    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        self.as_str().to_string().encode_by_ref(buf)
    }
}

impl<DB: Database> Type<DB> for FriendshipStatus
where
    String: Type<DB>,
{
    fn type_info() -> <DB as Database>::TypeInfo {
        <String as Type<DB>>::type_info()
    }
}

fn store_err(context: &str, e: sqlx::Error) -> FriendshipError {
    FriendshipError::Store(format!("{context}: {e}"))
}

pub struct MySqlFriendshipRepo;

impl MySqlFriendshipRepo {
    fn row_to_friendship(r: &MySqlRow) -> Result<Friendship, sqlx::Error> {
        Ok(Friendship {
            requester: r.try_get::<UserId, _>("requester_id")?,
            requestee: r.try_get::<UserId, _>("requestee_id")?,
            status: r.try_get::<FriendshipStatus, _>("status")?,
            created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: r.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }

    fn row_to_summary(r: &MySqlRow) -> Result<FriendSummary, sqlx::Error> {
        let other_user = r.try_get::<UserId, _>("other_user")?;
        Ok(FriendSummary {
            user_id: other_user,
            username: r.try_get::<String, _>("username")?,
            status: r.try_get::<FriendshipStatus, _>("status")?,
            is_requester: r.try_get::<UserId, _>("requester_id")? == other_user,
            since: r.try_get::<DateTime<Utc>, _>("since")?,
        })
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MySqlFriendshipRepo {
    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        mode: ReadMode,
    ) -> Result<Option<Friendship>, FriendshipError> {
        let tx = downcast(tx);

        let sql = format!(
            r#"
SELECT requester_id, requestee_id, status, created_at, updated_at
FROM friendship
WHERE user_min = ? AND user_max = ?{}
"#,
            lock_clause(mode)
        );
        let row = sqlx::query(&sql)
            .bind(pair.low())
            .bind(pair.high())
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| store_err("select friendship", e))?;

        row.map(|r| Self::row_to_friendship(&r))
            .transpose()
            .map_err(|e| store_err("decode friendship", e))
    }

    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        friendship: &Friendship,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);
        let pair = friendship.pair();

        let res = sqlx::query(
            r#"
INSERT INTO friendship (user_min, user_max, requester_id, requestee_id, status, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(pair.low())
        .bind(pair.high())
        .bind(friendship.requester)
        .bind(friendship.requestee)
        .bind(friendship.status)
        .bind(friendship.created_at)
        .bind(friendship.updated_at)
        .execute(tx.conn())
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(e) if is_dup_key(&e) => Err(FriendshipError::AlreadyExists),
            Err(e) => Err(store_err("insert friendship", e)),
        }
    }

    async fn update_status_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
        status: FriendshipStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), FriendshipError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
UPDATE friendship
SET status = ?, updated_at = ?
WHERE user_min = ? AND user_max = ?
"#,
        )
        .bind(status)
        .bind(updated_at)
        .bind(pair.low())
        .bind(pair.high())
        .execute(tx.conn())
        .await
        .map_err(|e| store_err("update friendship", e))?;

        Ok(())
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        pair: UserPair,
    ) -> Result<bool, FriendshipError> {
        let tx = downcast(tx);

        let res = sqlx::query("DELETE FROM friendship WHERE user_min = ? AND user_max = ?")
            .bind(pair.low())
            .bind(pair.high())
            .execute(tx.conn())
            .await
            .map_err(|e| store_err("delete friendship", e))?;

        Ok(res.rows_affected() > 0)
    }

    async fn list_for_user_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        user_id: UserId,
        page_size: PageSize,
        after: Option<FriendCursor>,
    ) -> Result<Vec<FriendSummary>, FriendshipError> {
        let tx = downcast(tx);

        let mut sql = String::from(
            r#"
SELECT
    IF(? = f.user_min, f.user_max, f.user_min) AS other_user,
    u.username                                 AS username,
    f.status                                   AS status,
    f.requester_id                             AS requester_id,
    f.updated_at                               AS since
FROM friendship f
JOIN user u
  ON u.user_id = IF(? = f.user_min, f.user_max, f.user_min)
WHERE (? = f.user_min OR ? = f.user_max)
"#,
        );
        if after.is_some() {
            sql.push_str(
                r#"
  AND (
      f.updated_at < ?
      OR (f.updated_at = ? AND IF(? = f.user_min, f.user_max, f.user_min) < ?)
  )
"#,
            );
        }
        sql.push_str(
            r#"
ORDER BY since DESC, other_user DESC
LIMIT ?
"#,
        );

        let mut query = sqlx::query(&sql)
            .bind(user_id)
            .bind(user_id)
            .bind(user_id)
            .bind(user_id);
        if let Some(cur) = after {
            query = query
                .bind(cur.since)
                .bind(cur.since)
                .bind(user_id)
                .bind(cur.other_user);
        }
        let rows = query
            .bind(page_size.0 as i64)
            .fetch_all(tx.conn())
            .await
            .map_err(|e| store_err("list friends", e))?;

        rows.iter()
            .map(Self::row_to_summary)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| store_err("decode friend", e))
    }
}
