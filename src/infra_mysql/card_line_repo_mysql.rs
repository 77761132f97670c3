use super::card_repo_mysql::card_store_err;
use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::Row;

pub struct MySqlCardLineRepo;

#[async_trait::async_trait]
impl CardLineRepo for MySqlCardLineRepo {
    async fn list_examples_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Example>, CardError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT example_id, example, translation
FROM example
WHERE card_id = ?
ORDER BY seq ASC
"#,
        )
        .bind(card_id)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| card_store_err("list examples", e))?;

        rows.iter()
            .map(|r| -> Result<Example, sqlx::Error> {
                Ok(Example {
                    example_id: r.try_get::<ExampleId, _>("example_id")?,
                    body: ExampleBody {
                        example: r.try_get::<String, _>("example")?,
                        translation: r.try_get::<Option<String>, _>("translation")?,
                    },
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| card_store_err("decode example", e))
    }

    async fn insert_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query(
            "INSERT INTO example (example_id, card_id, example, translation) VALUES (?, ?, ?, ?)",
        )
        .bind(example.example_id)
        .bind(card_id)
        .bind(&example.body.example)
        .bind(&example.body.translation)
        .execute(tx.conn())
        .await
        .map_err(|e| card_store_err("insert example", e))?;

        Ok(())
    }

    async fn update_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query(
            "UPDATE example SET example = ?, translation = ? WHERE example_id = ? AND card_id = ?",
        )
        .bind(&example.body.example)
        .bind(&example.body.translation)
        .bind(example.example_id)
        .bind(card_id)
        .execute(tx.conn())
        .await
        .map_err(|e| card_store_err("update example", e))?;

        Ok(())
    }

    async fn delete_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example_id: ExampleId,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query("DELETE FROM example WHERE example_id = ? AND card_id = ?")
            .bind(example_id)
            .bind(card_id)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("delete example", e))?;

        Ok(())
    }

    async fn list_translations_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Translation>, CardError> {
        let tx = downcast(tx);

        let rows = sqlx::query(
            r#"
SELECT translation_id, text
FROM translation
WHERE card_id = ?
ORDER BY seq ASC
"#,
        )
        .bind(card_id)
        .fetch_all(tx.conn())
        .await
        .map_err(|e| card_store_err("list translations", e))?;

        rows.iter()
            .map(|r| -> Result<Translation, sqlx::Error> {
                Ok(Translation {
                    translation_id: r.try_get::<TranslationId, _>("translation_id")?,
                    text: r.try_get::<String, _>("text")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| card_store_err("decode translation", e))
    }

    async fn insert_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query("INSERT INTO translation (translation_id, card_id, text) VALUES (?, ?, ?)")
            .bind(translation.translation_id)
            .bind(card_id)
            .bind(&translation.text)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("insert translation", e))?;

        Ok(())
    }

    async fn update_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query("UPDATE translation SET text = ? WHERE translation_id = ? AND card_id = ?")
            .bind(&translation.text)
            .bind(translation.translation_id)
            .bind(card_id)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("update translation", e))?;

        Ok(())
    }

    async fn delete_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation_id: TranslationId,
    ) -> Result<(), CardError> {
        let tx = downcast(tx);

        sqlx::query("DELETE FROM translation WHERE translation_id = ? AND card_id = ?")
            .bind(translation_id)
            .bind(card_id)
            .execute(tx.conn())
            .await
            .map_err(|e| card_store_err("delete translation", e))?;

        Ok(())
    }
}
