use super::store::state;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryCardLineRepo;

fn line_missing(kind: &str, id: impl std::fmt::Display, card_id: CardId) -> CardError {
    CardError::Store(format!("{kind} {id} not found on card {card_id}"))
}

#[async_trait::async_trait]
impl CardLineRepo for MemoryCardLineRepo {
    async fn list_examples_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Example>, CardError> {
        Ok(state(tx).examples.get(&card_id).cloned().unwrap_or_default())
    }

    async fn insert_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError> {
        state(tx)
            .examples
            .entry(card_id)
            .or_default()
            .push(example.clone());
        Ok(())
    }

    async fn update_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError> {
        let stored = state(tx)
            .examples
            .get_mut(&card_id)
            .and_then(|lines| lines.iter_mut().find(|e| e.example_id == example.example_id))
            .ok_or_else(|| line_missing("example", example.example_id, card_id))?;
        stored.body = example.body.clone();
        Ok(())
    }

    async fn delete_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example_id: ExampleId,
    ) -> Result<(), CardError> {
        if let Some(lines) = state(tx).examples.get_mut(&card_id) {
            lines.retain(|e| e.example_id != example_id);
        }
        Ok(())
    }

    async fn list_translations_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Translation>, CardError> {
        Ok(state(tx)
            .translations
            .get(&card_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError> {
        state(tx)
            .translations
            .entry(card_id)
            .or_default()
            .push(translation.clone());
        Ok(())
    }

    async fn update_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError> {
        let stored = state(tx)
            .translations
            .get_mut(&card_id)
            .and_then(|lines| {
                lines
                    .iter_mut()
                    .find(|t| t.translation_id == translation.translation_id)
            })
            .ok_or_else(|| line_missing("translation", translation.translation_id, card_id))?;
        stored.text = translation.text.clone();
        Ok(())
    }

    async fn delete_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation_id: TranslationId,
    ) -> Result<(), CardError> {
        if let Some(lines) = state(tx).translations.get_mut(&card_id) {
            lines.retain(|t| t.translation_id != translation_id);
        }
        Ok(())
    }
}
