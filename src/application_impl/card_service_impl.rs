use crate::application_impl::card_store::{CardStore, required_text};
use crate::application_impl::db_now;
use crate::application_port::{CardError, CardService};
use crate::domain_model::*;
use crate::domain_port::{ReadMode, StorageTx, TxManager};
use std::sync::Arc;
use tracing::{debug, info};

pub struct RealCardService {
    store: CardStore,
    tx_manager: Arc<dyn TxManager>,
}

impl RealCardService {
    pub fn new(store: CardStore, tx_manager: Arc<dyn TxManager>) -> Self {
        Self { store, tx_manager }
    }

    /// Loads the card row, hiding cards that belong to someone else.
    async fn owned_card_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        owner: UserId,
        card_id: CardId,
        mode: ReadMode,
    ) -> Result<CardRecord, CardError> {
        match self.store.cards.get_in_tx(tx, card_id, mode).await? {
            Some(card) if card.owner == owner => Ok(card),
            _ => Err(CardError::NotFound),
        }
    }

    async fn list_matching(
        &self,
        owner: UserId,
        entry_like: Option<&str>,
    ) -> Result<Vec<CardAggregate>, CardError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let records = self
            .store
            .cards
            .list_by_owner_in_tx(&mut *tx, owner, entry_like)
            .await?;
        let mut cards = Vec::with_capacity(records.len());
        for record in records {
            cards.push(self.store.load_in_tx(&mut *tx, record).await?);
        }

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        Ok(cards)
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[async_trait::async_trait]
impl CardService for RealCardService {
    async fn create_card(&self, owner: UserId, draft: CardDraft) -> Result<CardId, CardError> {
        let now = db_now();
        let card = CardRecord {
            card_id: CardId::new(),
            owner,
            entry: required_text("entry", &draft.entry)?,
            notes: optional_text(draft.notes),
            language: draft.language.trim().to_owned(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let report = self
            .store
            .insert_in_tx(
                &mut *tx,
                &card,
                draft.examples,
                draft.translations,
                &draft.tags,
                owner,
            )
            .await?;

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        info!(
            "card {} created for {owner}: {} tag(s), {} example(s), {} translation(s)",
            card.card_id, report.tags.added, report.examples.added, report.translations.added
        );
        Ok(card.card_id)
    }

    async fn get_card(&self, owner: UserId, card_id: CardId) -> Result<CardAggregate, CardError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let card = self
            .owned_card_in_tx(&mut *tx, owner, card_id, ReadMode::Plain)
            .await?;
        let card = self.store.load_in_tx(&mut *tx, card).await?;

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        Ok(card)
    }

    async fn list_cards(&self, owner: UserId) -> Result<Vec<CardAggregate>, CardError> {
        self.list_matching(owner, None).await
    }

    async fn search_cards(
        &self,
        owner: UserId,
        fragment: &str,
    ) -> Result<Vec<CardAggregate>, CardError> {
        let fragment = fragment.trim().to_lowercase();
        if fragment.is_empty() {
            return self.list_matching(owner, None).await;
        }
        self.list_matching(owner, Some(fragment.as_str())).await
    }

    async fn update_card(
        &self,
        owner: UserId,
        update: CardUpdate,
    ) -> Result<ReconcileReport, CardError> {
        let entry = required_text("entry", &update.entry)?;
        let notes = optional_text(update.notes);
        let language = update.language.trim().to_owned();

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let mut card = self
            .owned_card_in_tx(&mut *tx, owner, update.card_id, ReadMode::ForUpdate)
            .await?;

        let fields_changed =
            card.entry != entry || card.notes != notes || card.language != language;
        card.entry = entry;
        card.notes = notes;
        card.language = language;

        let report = ReconcileReport {
            fields_changed,
            examples: self
                .store
                .reconcile_examples_in_tx(&mut *tx, card.card_id, update.examples)
                .await?,
            translations: self
                .store
                .reconcile_translations_in_tx(&mut *tx, card.card_id, update.translations)
                .await?,
            tags: self
                .store
                .reconcile_tags_in_tx(&mut *tx, card.card_id, &update.tags, owner)
                .await?,
        };

        if !report.is_noop() {
            card.updated_at = db_now();
            self.store.cards.update_in_tx(&mut *tx, &card).await?;
        }

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        if !report.is_noop() {
            info!("card {} updated: {report:?}", card.card_id);
        }
        Ok(report)
    }

    async fn delete_card(&self, owner: UserId, card_id: CardId) -> Result<(), CardError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        self.owned_card_in_tx(&mut *tx, owner, card_id, ReadMode::ForUpdate)
            .await?;
        if !self.store.cards.delete_in_tx(&mut *tx, card_id).await? {
            return Err(CardError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        info!("card {card_id} deleted by {owner}");
        Ok(())
    }

    async fn list_tags(&self, owner: UserId) -> Result<Vec<Tag>, CardError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let tags = self.store.tags.list_for_owner_in_tx(&mut *tx, owner).await?;

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        Ok(tags)
    }

    async fn rename_tag(&self, owner: UserId, from: &str, to: &str) -> Result<usize, CardError> {
        let from = TagText::normalize(from)?;
        let to = TagText::normalize(to)?;
        if from == to {
            return Ok(0);
        }

        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        let Some(old) = self.store.tags.find_in_tx(&mut *tx, &from).await? else {
            debug!("rename of unknown tag '{from}' by {owner} ignored");
            return Ok(0);
        };
        let card_ids = self
            .store
            .tags
            .cards_with_tag_in_tx(&mut *tx, owner, old.tag_id)
            .await?;
        if card_ids.is_empty() {
            debug!("tag '{from}' is not on any card of {owner}");
            return Ok(0);
        }

        let new = self.store.tags.find_or_create_in_tx(&mut *tx, &to).await?;
        for card_id in &card_ids {
            self.store.tags.unlink_in_tx(&mut *tx, *card_id, old.tag_id).await?;
            self.store
                .tags
                .link_in_tx(&mut *tx, *card_id, new.tag_id, owner)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| CardError::Store(e.to_string()))?;

        info!("tag '{from}' renamed to '{to}' on {} card(s) of {owner}", card_ids.len());
        Ok(card_ids.len())
    }
}
