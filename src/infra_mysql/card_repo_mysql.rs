use super::util::{downcast, escape_like, lock_clause};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::mysql::MySqlRow;

pub(super) fn card_store_err(context: &str, e: sqlx::Error) -> CardError {
    CardError::Store(format!("{context}: {e}"))
}

pub struct MySqlCardRepo;

impl MySqlCardRepo {
    fn row_to_card(r: &MySqlRow) -> Result<CardRecord, sqlx::Error> {
        Ok(CardRecord {
            card_id: r.try_get::<CardId, _>("card_id")?,
            owner: r.try_get::<UserId, _>("owner_id")?,
            entry: r.try_get::<String, _>("entry")?,
            notes: r.try_get::<Option<String>, _>("notes")?,
            language: r.try_get::<String, _>("language")?,
            created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: r.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait::async_trait]
impl CardRepo for MySqlCardRepo {
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO card (card_id, owner_id, entry, notes, language, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(card.card_id)
        .bind(card.owner)
        .bind(&card.entry)
        .bind(&card.notes)
        .bind(&card.language)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(tx.conn())
        .await
        .map_err(|e| card_store_err("insert card", e))?;

        Ok(())
    }

    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        mode: ReadMode,
    ) -> Result<Option<CardRecord>, CardError> {
        let tx = downcast(tx);

        let sql = format!(
            r#"
SELECT card_id, owner_id, entry, notes, language, created_at, updated_at
FROM card
WHERE card_id = ?{}
"#,
            lock_clause(mode)
        );
        let row = sqlx::query(&sql)
            .bind(card_id)
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| card_store_err("select card", e))?;

        row.map(|r| Self::row_to_card(&r))
            .transpose()
            .map_err(|e| card_store_err("decode card", e))
    }

    async fn update_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
UPDATE card
SET entry = ?, notes = ?, language = ?, updated_at = ?
WHERE card_id = ?
"#,
        )
        .bind(&card.entry)
        .bind(&card.notes)
        .bind(&card.language)
        .bind(card.updated_at)
        .bind(card.card_id)
        .execute(tx.conn())
        .await
        .map_err(|e| card_store_err("update card", e))?;

        Ok(())
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<bool, CardError> {
        let tx = downcast(tx);

        // lines, tag links and suggestions cascade
        let res = sqlx::query("DELETE FROM card WHERE card_id = ?")
            .bind(card_id)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("delete card", e))?;

        Ok(res.rows_affected() > 0)
    }

    async fn list_by_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        entry_like: Option<&str>,
    ) -> Result<Vec<CardRecord>, CardError> {
        let tx = downcast(tx);

        let mut sql = String::from(
            r#"
SELECT card_id, owner_id, entry, notes, language, created_at, updated_at
FROM card
WHERE owner_id = ?
"#,
        );
        if entry_like.is_some() {
            sql.push_str("  AND LOWER(entry) LIKE CONCAT('%', ?, '%')\n");
        }
        sql.push_str("ORDER BY created_at DESC, card_id DESC\n");

        let mut query = sqlx::query(&sql).bind(owner);
        if let Some(fragment) = entry_like {
            query = query.bind(escape_like(fragment));
        }
        let rows = query
            .fetch_all(tx.conn())
            .await
            .map_err(|e| card_store_err("list cards", e))?;

        rows.iter()
            .map(Self::row_to_card)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| card_store_err("decode card", e))
    }
}
