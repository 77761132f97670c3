use super::store::state;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::BTreeSet;

pub struct MemoryTagRepo;

#[async_trait::async_trait]
impl TagRepo for MemoryTagRepo {
    async fn find_or_create_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Tag, CardError> {
        let tag_id = *state(tx).tags.entry(text.clone()).or_default();
        Ok(Tag {
            tag_id,
            text: text.clone(),
        })
    }

    async fn find_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        text: &TagText,
    ) -> Result<Option<Tag>, CardError> {
        Ok(state(tx).tags.get(text).map(|tag_id| Tag {
            tag_id: *tag_id,
            text: text.clone(),
        }))
    }

    async fn list_for_card_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<Vec<Tag>, CardError> {
        let state = state(tx);
        // dictionary order is text order
        Ok(state
            .tags
            .iter()
            .filter(|(_, tag_id)| state.card_tags.contains_key(&(card_id, **tag_id)))
            .map(|(text, tag_id)| Tag {
                tag_id: *tag_id,
                text: text.clone(),
            })
            .collect())
    }

    async fn list_for_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
    ) -> Result<Vec<Tag>, CardError> {
        let state = state(tx);
        let owned: BTreeSet<TagId> = state
            .card_tags
            .keys()
            .filter(|(card_id, _)| state.cards.get(card_id).is_some_and(|c| c.owner == owner))
            .map(|(_, tag_id)| *tag_id)
            .collect();
        Ok(state
            .tags
            .iter()
            .filter(|(_, tag_id)| owned.contains(tag_id))
            .map(|(text, tag_id)| Tag {
                tag_id: *tag_id,
                text: text.clone(),
            })
            .collect())
    }

    async fn cards_with_tag_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        tag_id: TagId,
    ) -> Result<Vec<CardId>, CardError> {
        let state = state(tx);
        Ok(state
            .card_tags
            .keys()
            .filter(|(card_id, linked)| {
                *linked == tag_id && state.cards.get(card_id).is_some_and(|c| c.owner == owner)
            })
            .map(|(card_id, _)| *card_id)
            .collect())
    }

    async fn link_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
        created_by: UserId,
    ) -> Result<(), CardError> {
        state(tx)
            .card_tags
            .entry((card_id, tag_id))
            .or_insert(created_by);
        Ok(())
    }

    async fn unlink_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        tag_id: TagId,
    ) -> Result<(), CardError> {
        state(tx).card_tags.remove(&(card_id, tag_id));
        Ok(())
    }
}
