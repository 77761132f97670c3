use super::store::state;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryCardRepo;

#[async_trait::async_trait]
impl CardRepo for MemoryCardRepo {
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError> {
        let cards = &mut state(tx).cards;
        if cards.contains_key(&card.card_id) {
            return Err(CardError::Store(format!("duplicate card id {}", card.card_id)));
        }
        cards.insert(card.card_id, card.clone());
        Ok(())
    }

    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        _mode: ReadMode,
    ) -> Result<Option<CardRecord>, CardError> {
        Ok(state(tx).cards.get(&card_id).cloned())
    }

    async fn update_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
    ) -> Result<(), CardError> {
        let stored = state(tx)
            .cards
            .get_mut(&card.card_id)
            .ok_or(CardError::NotFound)?;
        stored.entry = card.entry.clone();
        stored.notes = card.notes.clone();
        stored.language = card.language.clone();
        stored.updated_at = card.updated_at;
        Ok(())
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
    ) -> Result<bool, CardError> {
        let state = state(tx);
        if state.cards.remove(&card_id).is_none() {
            return Ok(false);
        }
        state.examples.remove(&card_id);
        state.translations.remove(&card_id);
        state.card_tags.retain(|(card, _), _| *card != card_id);
        state.suggestions.retain(|_, s| s.card_id != card_id);
        Ok(true)
    }

    async fn list_by_owner_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        entry_like: Option<&str>,
    ) -> Result<Vec<CardRecord>, CardError> {
        let mut cards: Vec<CardRecord> = state(tx)
            .cards
            .values()
            .filter(|c| c.owner == owner)
            .filter(|c| entry_like.is_none_or(|frag| c.entry.to_lowercase().contains(frag)))
            .cloned()
            .collect();
        cards.sort_by(|a, b| (b.created_at, b.card_id).cmp(&(a.created_at, a.card_id)));
        Ok(cards)
    }
}
