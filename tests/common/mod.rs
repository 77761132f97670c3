//! Shared fixtures for integration tests.

#![allow(dead_code)]

use linguarium::domain_model::*;
use linguarium::server::Server;
use linguarium::settings::SeedUser;

/// An in-memory server holding one fresh user per name, in the same order.
pub async fn server_with_users(names: &[&str]) -> (Server, Vec<UserId>) {
    let seed: Vec<SeedUser> = names
        .iter()
        .map(|name| SeedUser {
            user_id: UserId::new(),
            username: name.to_string(),
        })
        .collect();
    let server = Server::in_memory(&seed).await.unwrap();
    (server, seed.into_iter().map(|u| u.user_id).collect())
}

pub fn draft(entry: &str, tags: &[&str]) -> CardDraft {
    CardDraft {
        entry: entry.to_string(),
        notes: None,
        language: "en".to_string(),
        examples: vec![ExampleBody {
            example: format!("{entry} in a sentence"),
            translation: Some(format!("{entry} translated")),
        }],
        translations: vec![format!("{entry}-tr")],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The update that restates `card` exactly as it is stored.
pub fn unchanged(card: &CardAggregate) -> CardUpdate {
    CardUpdate {
        card_id: card.card.card_id,
        entry: card.card.entry.clone(),
        notes: card.card.notes.clone(),
        language: card.card.language.clone(),
        examples: card
            .examples
            .iter()
            .map(|e| Line::existing(e.example_id, e.body.clone()))
            .collect(),
        translations: card
            .translations
            .iter()
            .map(|t| Line::existing(t.translation_id, t.text.clone()))
            .collect(),
        tags: card.tags.iter().map(|t| t.text.to_string()).collect(),
    }
}
