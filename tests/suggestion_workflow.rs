//! Suggest, accept and decline against the in-memory backend.

mod common;

use common::{draft, server_with_users};
use linguarium::application_port::SuggestionError;
use linguarium::domain_model::*;

#[tokio::test]
async fn test_duplicate_suggestion_returns_false() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let card_id = server
        .card_service
        .create_card(alice, draft("hello", &["greetings"]))
        .await
        .unwrap();

    assert!(server.suggestion_service.suggest_card(alice, bob, card_id).await.unwrap());
    assert!(!server.suggestion_service.suggest_card(alice, bob, card_id).await.unwrap());

    let pending = server.suggestion_service.list_suggestions(bob).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].suggestion.sender, alice);
    assert_eq!(pending[0].card.card.entry, "hello");
}

#[tokio::test]
async fn test_accept_clones_card_and_consumes_suggestion() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let source_id = server
        .card_service
        .create_card(alice, draft("hello", &["Greetings", "basics"]))
        .await
        .unwrap();
    server
        .suggestion_service
        .suggest_card(alice, bob, source_id)
        .await
        .unwrap();
    let suggestion_id = server.suggestion_service.list_suggestions(bob).await.unwrap()[0]
        .suggestion
        .suggestion_id;

    let copy_id = server
        .suggestion_service
        .accept_suggestion(suggestion_id, bob)
        .await
        .unwrap();
    assert_ne!(copy_id, source_id);

    let source = server.card_service.get_card(alice, source_id).await.unwrap();
    let copy = server.card_service.get_card(bob, copy_id).await.unwrap();
    assert_eq!(copy.card.owner, bob);
    assert_eq!(copy.card.entry, source.card.entry);
    assert_eq!(copy.card.language, source.card.language);

    let bodies = |c: &CardAggregate| c.examples.iter().map(|e| e.body.clone()).collect::<Vec<_>>();
    assert_eq!(bodies(&copy), bodies(&source));
    assert_ne!(copy.examples[0].example_id, source.examples[0].example_id);
    let texts = |c: &CardAggregate| c.translations.iter().map(|t| t.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(&copy), texts(&source));
    assert_eq!(copy.tags, source.tags);

    assert!(server.suggestion_service.list_suggestions(bob).await.unwrap().is_empty());
    assert_eq!(server.card_service.list_cards(bob).await.unwrap().len(), 1);

    let err = server
        .suggestion_service
        .accept_suggestion(suggestion_id, bob)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn test_only_the_recipient_can_accept() {
    let (server, users) = server_with_users(&["alice", "bob", "carol"]).await;
    let (alice, bob, carol) = (users[0], users[1], users[2]);
    let card_id = server
        .card_service
        .create_card(alice, draft("hello", &[]))
        .await
        .unwrap();
    server
        .suggestion_service
        .suggest_card(alice, bob, card_id)
        .await
        .unwrap();
    let suggestion_id = server.suggestion_service.list_suggestions(bob).await.unwrap()[0]
        .suggestion
        .suggestion_id;

    let err = server
        .suggestion_service
        .accept_suggestion(suggestion_id, carol)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::NotFound), "got {err:?}");
    assert!(server.card_service.list_cards(carol).await.unwrap().is_empty());
    assert_eq!(server.suggestion_service.list_suggestions(bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_decline_deletes_the_triple() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let card_id = server
        .card_service
        .create_card(alice, draft("hello", &[]))
        .await
        .unwrap();
    server
        .suggestion_service
        .suggest_card(alice, bob, card_id)
        .await
        .unwrap();

    server
        .suggestion_service
        .decline_suggestion(alice, bob, card_id)
        .await
        .unwrap();
    assert!(server.suggestion_service.list_suggestions(bob).await.unwrap().is_empty());

    let err = server
        .suggestion_service
        .decline_suggestion(alice, bob, card_id)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::NotFound), "got {err:?}");

    // declined offers can be made again
    assert!(server.suggestion_service.suggest_card(alice, bob, card_id).await.unwrap());
}

#[tokio::test]
async fn test_invalid_suggestions_are_rejected() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let card_id = server
        .card_service
        .create_card(alice, draft("hello", &[]))
        .await
        .unwrap();

    let err = server
        .suggestion_service
        .suggest_card(alice, alice, card_id)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::InvalidArgument(_)), "got {err:?}");

    let err = server
        .suggestion_service
        .suggest_card(alice, bob, CardId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::CardNotFound), "got {err:?}");

    let err = server
        .suggestion_service
        .suggest_card(alice, UserId::new(), card_id)
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::UserNotFound), "got {err:?}");
}

#[tokio::test]
async fn test_deleting_the_card_withdraws_its_suggestions() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let card_id = server
        .card_service
        .create_card(alice, draft("hello", &[]))
        .await
        .unwrap();
    server
        .suggestion_service
        .suggest_card(alice, bob, card_id)
        .await
        .unwrap();

    server.card_service.delete_card(alice, card_id).await.unwrap();
    assert!(server.suggestion_service.list_suggestions(bob).await.unwrap().is_empty());
}
