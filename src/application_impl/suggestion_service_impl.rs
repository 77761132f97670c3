use crate::application_impl::card_store::CardStore;
use crate::application_impl::db_now;
use crate::application_port::{SuggestionError, SuggestionService};
use crate::domain_model::*;
use crate::domain_port::{ReadMode, SuggestionRepo, TxManager, UserRepo};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RealSuggestionService {
    user_repo: Arc<dyn UserRepo>,
    suggestion_repo: Arc<dyn SuggestionRepo>,
    cards: CardStore,
    tx_manager: Arc<dyn TxManager>,
}

impl RealSuggestionService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        suggestion_repo: Arc<dyn SuggestionRepo>,
        cards: CardStore,
        tx_manager: Arc<dyn TxManager>,
    ) -> Self {
        Self {
            user_repo,
            suggestion_repo,
            cards,
            tx_manager,
        }
    }
}

#[async_trait::async_trait]
impl SuggestionService for RealSuggestionService {
    async fn suggest_card(
        &self,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<bool, SuggestionError> {
        if sender == recipient {
            return Err(SuggestionError::InvalidArgument(
                "cannot suggest a card to yourself".to_string(),
            ));
        }

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        self.user_repo
            .get_in_tx(&mut *tx, recipient)
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?
            .ok_or(SuggestionError::UserNotFound)?;
        self.cards
            .cards
            .get_in_tx(&mut *tx, card_id, ReadMode::Plain)
            .await?
            .ok_or(SuggestionError::CardNotFound)?;

        let suggestion = CardSuggestion {
            suggestion_id: SuggestionId::new(),
            sender,
            recipient,
            card_id,
            created_at: db_now(),
        };
        if !self.suggestion_repo.insert_in_tx(&mut *tx, &suggestion).await? {
            debug!("suggestion of {card_id} from {sender} to {recipient} already pending");
            return Ok(false);
        }

        tx.commit()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        info!("card {card_id} suggested by {sender} to {recipient}");
        Ok(true)
    }

    async fn list_suggestions(
        &self,
        recipient: UserId,
    ) -> Result<Vec<SuggestedCard>, SuggestionError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        let suggestions = self
            .suggestion_repo
            .list_for_recipient_in_tx(&mut *tx, recipient)
            .await?;
        let mut out = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            let Some(card) = self
                .cards
                .cards
                .get_in_tx(&mut *tx, suggestion.card_id, ReadMode::Plain)
                .await?
            else {
                warn!(
                    "suggestion {} points at missing card {}",
                    suggestion.suggestion_id, suggestion.card_id
                );
                continue;
            };
            let card = self.cards.load_in_tx(&mut *tx, card).await?;
            out.push(SuggestedCard { suggestion, card });
        }

        tx.commit()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        Ok(out)
    }

    async fn accept_suggestion(
        &self,
        suggestion_id: SuggestionId,
        recipient: UserId,
    ) -> Result<CardId, SuggestionError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        let suggestion = match self
            .suggestion_repo
            .get_in_tx(&mut *tx, suggestion_id, ReadMode::ForUpdate)
            .await?
        {
            Some(s) if s.recipient == recipient => s,
            _ => return Err(SuggestionError::NotFound),
        };

        let source = self
            .cards
            .cards
            .get_in_tx(&mut *tx, suggestion.card_id, ReadMode::Plain)
            .await?
            .ok_or(SuggestionError::CardNotFound)?;
        let source = self.cards.load_in_tx(&mut *tx, source).await?;

        let now = db_now();
        let copy = CardRecord {
            card_id: CardId::new(),
            owner: recipient,
            entry: source.card.entry,
            notes: source.card.notes,
            language: source.card.language,
            created_at: now,
            updated_at: now,
        };
        let examples = source.examples.into_iter().map(|e| e.body).collect();
        let translations = source.translations.into_iter().map(|t| t.text).collect();
        let tags: Vec<String> = source
            .tags
            .into_iter()
            .map(|t| t.text.as_str().to_owned())
            .collect();

        self.cards
            .insert_in_tx(&mut *tx, &copy, examples, translations, &tags, recipient)
            .await?;
        self.suggestion_repo
            .delete_in_tx(&mut *tx, suggestion_id)
            .await?;

        tx.commit()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        info!(
            "suggestion {suggestion_id} accepted: card {} copied to {recipient} as {}",
            suggestion.card_id, copy.card_id
        );
        Ok(copy.card_id)
    }

    async fn decline_suggestion(
        &self,
        sender: UserId,
        recipient: UserId,
        card_id: CardId,
    ) -> Result<(), SuggestionError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        if !self
            .suggestion_repo
            .delete_triple_in_tx(&mut *tx, sender, recipient, card_id)
            .await?
        {
            return Err(SuggestionError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| SuggestionError::Store(e.to_string()))?;

        info!("suggestion of {card_id} from {sender} declined by {recipient}");
        Ok(())
    }
}
