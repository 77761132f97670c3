use crate::application_port::CardError;
use crate::domain_model::*;
use crate::domain_port::{CardLineRepo, CardRepo, StorageTx, TagRepo};
use std::sync::Arc;

/// Reads and writes whole card aggregates inside a caller-owned transaction.
///
/// Owned collections are always written through the reconcile planners, so a
/// fresh card is just a reconciliation against empty collections.
#[derive(Clone)]
pub struct CardStore {
    pub(crate) cards: Arc<dyn CardRepo>,
    lines: Arc<dyn CardLineRepo>,
    pub(crate) tags: Arc<dyn TagRepo>,
}

impl CardStore {
    pub fn new(
        cards: Arc<dyn CardRepo>,
        lines: Arc<dyn CardLineRepo>,
        tags: Arc<dyn TagRepo>,
    ) -> Self {
        Self { cards, lines, tags }
    }

    pub async fn load_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: CardRecord,
    ) -> Result<CardAggregate, CardError> {
        let examples = self.lines.list_examples_in_tx(tx, card.card_id).await?;
        let translations = self.lines.list_translations_in_tx(tx, card.card_id).await?;
        let tags = self.tags.list_for_card_in_tx(tx, card.card_id).await?;

        Ok(CardAggregate {
            card,
            examples,
            translations,
            tags,
        })
    }

    /// Inserts `card` and its collections. Tags are linked on behalf of `acting`.
    pub async fn insert_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card: &CardRecord,
        examples: Vec<ExampleBody>,
        translations: Vec<String>,
        tags: &[String],
        acting: UserId,
    ) -> Result<ReconcileReport, CardError> {
        self.cards.insert_in_tx(tx, card).await?;

        let examples = examples.into_iter().map(Line::new).collect();
        let translations = translations.into_iter().map(Line::new).collect();

        Ok(ReconcileReport {
            fields_changed: true,
            examples: self.reconcile_examples_in_tx(tx, card.card_id, examples).await?,
            translations: self
                .reconcile_translations_in_tx(tx, card.card_id, translations)
                .await?,
            tags: self.reconcile_tags_in_tx(tx, card.card_id, tags, acting).await?,
        })
    }

    pub async fn reconcile_tags_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        raw_tags: &[String],
        acting: UserId,
    ) -> Result<ChangeCount, CardError> {
        let current = self.tags.list_for_card_in_tx(tx, card_id).await?;
        let mut desired = Vec::with_capacity(raw_tags.len());
        for raw in raw_tags {
            match TagText::normalize(raw) {
                Ok(text) => desired.push(text),
                Err(TagTextError::Blank) => {}
                Err(err) => return Err(err.into()),
            }
        }
        let diff = diff_keys(desired, current.iter().map(|t| t.text.clone()));

        for text in &diff.removed {
            if let Some(tag) = current.iter().find(|t| &t.text == text) {
                self.tags.unlink_in_tx(tx, card_id, tag.tag_id).await?;
            }
        }
        for text in &diff.added {
            let tag = self.tags.find_or_create_in_tx(tx, text).await?;
            self.tags.link_in_tx(tx, card_id, tag.tag_id, acting).await?;
        }

        Ok(ChangeCount::from(&diff))
    }

    pub async fn reconcile_examples_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        desired: Vec<Line<ExampleId, ExampleBody>>,
    ) -> Result<ChangeCount, CardError> {
        let desired = desired
            .into_iter()
            .map(|line| -> Result<_, CardError> {
                Ok(Line {
                    id: line.id,
                    body: clean_example(line.body)?,
                })
            })
            .collect::<Result<Vec<_>, CardError>>()?;
        let current: Vec<(ExampleId, ExampleBody)> = self
            .lines
            .list_examples_in_tx(tx, card_id)
            .await?
            .into_iter()
            .map(|e| (e.example_id, e.body))
            .collect();

        let plan = plan_lines(desired, &current)?;
        let count = ChangeCount::from(&plan);

        for example_id in plan.deletes {
            self.lines
                .delete_example_in_tx(tx, card_id, example_id)
                .await?;
        }
        for (example_id, body) in plan.updates {
            self.lines
                .update_example_in_tx(tx, card_id, &Example { example_id, body })
                .await?;
        }
        for body in plan.inserts {
            let example = Example {
                example_id: ExampleId::new(),
                body,
            };
            self.lines.insert_example_in_tx(tx, card_id, &example).await?;
        }

        Ok(count)
    }

    pub async fn reconcile_translations_in_tx(
        &self,
        tx: &mut dyn StorageTx<'_>,
        card_id: CardId,
        desired: Vec<Line<TranslationId, String>>,
    ) -> Result<ChangeCount, CardError> {
        let desired = desired
            .into_iter()
            .map(|line| -> Result<_, CardError> {
                Ok(Line {
                    id: line.id,
                    body: required_text("translation", &line.body)?,
                })
            })
            .collect::<Result<Vec<_>, CardError>>()?;
        let current: Vec<(TranslationId, String)> = self
            .lines
            .list_translations_in_tx(tx, card_id)
            .await?
            .into_iter()
            .map(|t| (t.translation_id, t.text))
            .collect();

        let plan = plan_lines(desired, &current)?;
        let count = ChangeCount::from(&plan);

        for translation_id in plan.deletes {
            self.lines
                .delete_translation_in_tx(tx, card_id, translation_id)
                .await?;
        }
        for (translation_id, text) in plan.updates {
            self.lines
                .update_translation_in_tx(tx, card_id, &Translation { translation_id, text })
                .await?;
        }
        for text in plan.inserts {
            let translation = Translation {
                translation_id: TranslationId::new(),
                text,
            };
            self.lines
                .insert_translation_in_tx(tx, card_id, &translation)
                .await?;
        }

        Ok(count)
    }
}

pub(crate) fn required_text(field: &str, value: &str) -> Result<String, CardError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CardError::InvalidArgument(format!("{field} must not be blank")));
    }
    Ok(value.to_owned())
}

fn clean_example(body: ExampleBody) -> Result<ExampleBody, CardError> {
    Ok(ExampleBody {
        example: required_text("example", &body.example)?,
        translation: body
            .translation
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty()),
    })
}
