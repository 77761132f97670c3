use super::card_repo_mysql::card_store_err;
use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::Row;

pub struct MySqlTagRepo;

#[async_trait::async_trait]
impl TagRepo for MySqlTagRepo {
    async fn find_or_create_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Tag, CardError> {
        {
            let tx = downcast(tx);
            // the unique key on text makes a concurrent creator a no-op
            sqlx::query(
                "INSERT INTO tag (tag_id, text) VALUES (?, ?) ON DUPLICATE KEY UPDATE tag_id = tag_id",
            )
            .bind(TagId::new())
            .bind(text.as_str())
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("insert tag", e))?;
        }

        self.find_in_tx(tx, text)
            .await?
            .ok_or_else(|| CardError::Store(format!("tag {text} vanished after insert")))
    }

    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Option<Tag>, CardError> {
        let tx = downcast(tx);

        let row = sqlx::query("SELECT tag_id FROM tag WHERE text = ?")
            .bind(text.as_str())
            .fetch_optional(tx.conn())
            .await
            .map_err(|e| card_store_err("select tag", e))?;

        row.map(|r| -> Result<Tag, sqlx::Error> {
            Ok(Tag {
                tag_id: r.try_get::<TagId, _>("tag_id")?,
                text: text.clone(),
            })
        })
        .transpose()
        .map_err(|e| card_store_err("decode tag", e))
    }

    async fn list_for_card_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Tag>, CardError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT t.tag_id, t.text
FROM card_tag ct
JOIN tag t ON t.tag_id = ct.tag_id
WHERE ct.card_id = ?
ORDER BY t.text ASC
"#,
        )
        .bind(card_id)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| card_store_err("list card tags", e))?;

        rows.iter()
            .map(|r| -> Result<Tag, sqlx::Error> {
                Ok(Tag {
                    tag_id: r.try_get::<TagId, _>("tag_id")?,
                    text: TagText::from_stored(r.try_get::<String, _>("text")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| card_store_err("decode tag", e))
    }

    async fn list_for_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
    ) -> Result<Vec<Tag>, CardError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT DISTINCT t.tag_id, t.text
FROM card c
JOIN card_tag ct ON ct.card_id = c.card_id
JOIN tag t ON t.tag_id = ct.tag_id
WHERE c.owner_id = ?
ORDER BY t.text ASC
"#,
        )
        .bind(owner)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| card_store_err("list owner tags", e))?;

        rows.iter()
            .map(|r| -> Result<Tag, sqlx::Error> {
                Ok(Tag {
                    tag_id: r.try_get::<TagId, _>("tag_id")?,
                    text: TagText::from_stored(r.try_get::<String, _>("text")?),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| card_store_err("decode tag", e))
    }

    async fn cards_with_tag_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        tag_id: TagId,
    ) -> Result<Vec<CardId>, CardError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT c.card_id
FROM card c
JOIN card_tag ct ON ct.card_id = c.card_id
WHERE c.owner_id = ? AND ct.tag_id = ?
ORDER BY c.card_id
FOR UPDATE
"#,
        )
        .bind(owner)
        .bind(tag_id)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| card_store_err("list tagged cards", e))?;

        rows.iter()
            .map(|r| r.try_get::<CardId, _>("card_id"))
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| card_store_err("decode card id", e))
    }

    async fn link_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
        created_by: UserId,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query(
            r#"
INSERT INTO card_tag (card_id, tag_id, created_by)
VALUES (?, ?, ?)
ON DUPLICATE KEY UPDATE card_id = card_id
"#,
        )
        .bind(card_id)
        .bind(tag_id)
        .bind(created_by)
        .execute(tx.conn())
        .await
        .map_err(|e| card_store_err("link tag", e))?;

        Ok(())
    }

    async fn unlink_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query("DELETE FROM card_tag WHERE card_id = ? AND tag_id = ?")
            .bind(card_id)
            .bind(tag_id)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("unlink tag", e))?;

        Ok(())
    }
}
