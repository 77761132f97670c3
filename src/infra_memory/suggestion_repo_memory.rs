use super::store::state;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemorySuggestionRepo;

#[async_trait::async_trait]
impl SuggestionRepo for MemorySuggestionRepo {
    async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion: &CardSuggestion,
    ) -> Result<bool, SuggestionError> {
        let suggestions = &mut state(tx).suggestions;
        let duplicate = suggestions.values().any(|s| {
            s.sender == suggestion.sender
                && s.recipient == suggestion.recipient
                && s.card_id == suggestion.card_id
        });
        if duplicate {
            return Ok(false);
        }
        suggestions.insert(suggestion.suggestion_id, suggestion.clone());
        Ok(true)
    }

    async fn get_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
        _mode: ReadMode,
    ) -> Result<Option<CardSuggestion>, SuggestionError> {
        Ok(state(tx).suggestions.get(&suggestion_id).cloned())
    }

    async fn delete_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        suggestion_id: SuggestionId,
    ) -> Result<bool, SuggestionError> {
        Ok(state(tx).suggestions.remove(&suggestion_id).is_some())
    }

    async fn delete_triple_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<bool, SuggestionError> {
        let suggestions = &mut state(tx).suggestions;
        let before = suggestions.len();
        suggestions.retain(|_, s| {
            !(s.sender == sender && s.recipient == recipient && s.card_id == card_id)
        });
        Ok(suggestions.len() != before)
    }

    async fn list_for_recipient_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        recipient: UserId,
    ) -> Result<Vec<CardSuggestion>, SuggestionError> {
        let mut out: Vec<CardSuggestion> = state(tx)
            .suggestions
            .values()
            .filter(|s| s.recipient == recipient)
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.created_at, s.suggestion_id));
        Ok(out)
    }
}
