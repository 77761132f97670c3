use super::util::{downcast, is_dup_key, lock_clause};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::mysql::MySqlRow;

fn store_err(context: &str, e: sqlx::Error) -> SuggestionError {
    SuggestionError::Store(format!("{context}: {e}"))
}

pub struct MySqlSuggestionRepo;

impl MySqlSuggestionRepo {
    fn row_to_suggestion(r: &MySqlRow) -> Result<CardSuggestion, sqlx::Error> {
        Ok(CardSuggestion {
            suggestion_id: r.try_get::<SuggestionId, _>("suggestion_id")?,
            sender: r.try_get::<UserId, _>("sender_id")?,
            recipient: r.try_get::<UserId, _>("recipient_id")?,
            card_id: r.try_get::<CardId, _>("card_id")?,
            created_at: r.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

#[async_trait::async_trait]
impl SuggestionRepo for MySqlSuggestionRepo {
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion: &CardSuggestion,
    ) -> Result<bool, SuggestionError> {
        let tx = downcast(tx);

        let res = sqlx::query(
            r#"
INSERT INTO card_suggestion (suggestion_id, sender_id, recipient_id, card_id, created_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(suggestion.suggestion_id)
        .bind(suggestion.sender)
        .bind(suggestion.recipient)
        .bind(suggestion.card_id)
        .bind(suggestion.created_at)
        .execute(tx.conn())
        .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) if is_dup_key(&e) => Ok(false),
            Err(e) => Err(store_err("insert suggestion", e)),
        }
    }

    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
        mode: ReadMode,
    ) -> Result<Option<CardSuggestion>, SuggestionError> {
        let tx = downcast(tx);

        let sql = format!(
            r#"
SELECT suggestion_id, sender_id, recipient_id, card_id, created_at
FROM card_suggestion
WHERE suggestion_id = ?{}
"#,
            lock_clause(mode)
        );
        let row = sqlx::query(&sql)
            .bind(suggestion_id)
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| store_err("select suggestion", e))?;

        row.map(|r| Self::row_to_suggestion(&r))
            .transpose()
            .map_err(|e| store_err("decode suggestion", e))
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
    ) -> Result<bool, SuggestionError> {
        let tx = downcast(tx);

        let res = sqlx::query("DELETE FROM card_suggestion WHERE suggestion_id = ?")
            .bind(suggestion_id)
            .execute(tx.conn())
            .await
            .map_err(|e| store_err("delete suggestion", e))?;

        Ok(res.rows_affected() > 0)
    }

    async fn delete_triple_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<bool, SuggestionError> {
        let tx = downcast(tx);

        let res = sqlx::query(
            r#"
DELETE FROM card_suggestion
WHERE sender_id = ? AND recipient_id = ? AND card_id = ?
"#,
        )
        .bind(sender)
        .bind(recipient)
        .bind(card_id)
        .execute(tx.conn())
        .await
        .map_err(|e| store_err("delete suggestion", e))?;

        Ok(res.rows_affected() > 0)
    }

    async fn list_for_recipient_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        recipient: UserId,
    ) -> Result<Vec<CardSuggestion>, SuggestionError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT suggestion_id, sender_id, recipient_id, card_id, created_at
FROM card_suggestion
WHERE recipient_id = ?
ORDER BY created_at ASC, suggestion_id ASC
"#,
        )
        .bind(recipient)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| store_err("list suggestions", e))?;

        rows.iter()
            .map(Self::row_to_suggestion)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| store_err("decode suggestion", e))
    }
}
