use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Examples and translations. Every line belongs to exactly one card, and the
/// write methods only touch lines of the card they are given.
#[async_trait::async_trait]
pub trait CardLineRepo: Send + Sync {
    async fn list_examples_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Example>, CardError>;
    async fn insert_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError>;
    async fn update_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example: &Example,
    ) -> Result<(), CardError>;
    async fn delete_example_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        example_id: ExampleId,
    ) -> Result<(), CardError>;

    async fn list_translations_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Translation>, CardError>;
    async fn insert_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError>;
    async fn update_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation: &Translation,
    ) -> Result<(), CardError>;
    async fn delete_translation_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        translation_id: TranslationId,
    ) -> Result<(), CardError>;
}
