//! Friendship state machine against the in-memory backend.

mod common;

use common::server_with_users;
use linguarium::application_port::FriendshipError;
use linguarium::domain_model::*;

#[tokio::test]
async fn test_request_to_self_is_invalid() {
    let (server, users) = server_with_users(&["alice"]).await;
    let alice = users[0];

    let err = server.friendship_service.request(alice, alice).await.unwrap_err();
    assert!(matches!(err, FriendshipError::InvalidArgument(_)), "got {err:?}");
}

#[tokio::test]
async fn test_request_creates_pending_row() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    let created = server.friendship_service.request(alice, bob).await.unwrap();
    assert_eq!(created.status, FriendshipStatus::Pending);
    assert_eq!(created.requester, alice);
    assert_eq!(created.requestee, bob);

    let stored = server
        .friendship_service
        .get_friendship(bob, alice)
        .await
        .unwrap()
        .expect("row for the pair");
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_reverse_request_already_exists() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    server.friendship_service.request(alice, bob).await.unwrap();
    let err = server.friendship_service.request(bob, alice).await.unwrap_err();
    assert!(matches!(err, FriendshipError::AlreadyExists), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_leave_one_row() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = server.friendship_service.clone();
        let (me, other) = if i % 2 == 0 { (alice, bob) } else { (bob, alice) };
        handles.push(tokio::spawn(async move { service.request(me, other).await }));
    }

    let mut won = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(FriendshipError::AlreadyExists) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }
    assert_eq!(won, 1, "exactly one request must win");

    let friends = server
        .friendship_service
        .list_friends(alice, PageSize::default(), None)
        .await
        .unwrap();
    assert_eq!(friends.len(), 1);
}

#[tokio::test]
async fn test_accept_moves_pending_to_friends() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    server.friendship_service.request(alice, bob).await.unwrap();
    let accepted = server.friendship_service.accept(bob, alice).await.unwrap();
    assert_eq!(accepted.status, FriendshipStatus::Friends);

    let err = server.friendship_service.accept(bob, alice).await.unwrap_err();
    assert!(
        matches!(err, FriendshipError::InvalidState(FriendshipStatus::Friends)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_requester_cannot_accept_own_request() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    server.friendship_service.request(alice, bob).await.unwrap();
    let err = server.friendship_service.accept(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn test_accept_without_request_is_not_found() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;

    let err = server
        .friendship_service
        .accept(users[0], users[1])
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn test_block_by_requester_records_blocker() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    server.friendship_service.request(alice, bob).await.unwrap();
    let blocked = server.friendship_service.block(alice, bob).await.unwrap();

    assert_eq!(
        blocked.status,
        FriendshipStatus::Blocked {
            by: PartyRole::Requester
        }
    );
    assert_eq!(blocked.who_denies_friendship(), Some(alice));
    assert_eq!(blocked.blocked_party(), Some(bob));

    let err = server.friendship_service.request(bob, alice).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotAllowed(_)), "got {err:?}");
    let err = server.friendship_service.request(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::AlreadyExists), "got {err:?}");
}

#[tokio::test]
async fn test_block_by_requestee_records_blocker() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    server.friendship_service.request(alice, bob).await.unwrap();
    server.friendship_service.accept(bob, alice).await.unwrap();
    let blocked = server.friendship_service.block(bob, alice).await.unwrap();

    assert_eq!(
        blocked.status,
        FriendshipStatus::Blocked {
            by: PartyRole::Requestee
        }
    );
    assert_eq!(blocked.who_denies_friendship(), Some(bob));
    assert_eq!(blocked.blocked_party(), Some(alice));

    let err = server.friendship_service.request(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotAllowed(_)), "got {err:?}");
}

#[tokio::test]
async fn test_block_requires_live_relationship() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);

    let err = server.friendship_service.block(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound), "got {err:?}");

    server.friendship_service.request(alice, bob).await.unwrap();
    server.friendship_service.block(bob, alice).await.unwrap();
    let err = server.friendship_service.block(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::InvalidState(_)), "got {err:?}");
}

#[tokio::test]
async fn test_request_after_removal_starts_fresh() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let service = &server.friendship_service;

    service.request(alice, bob).await.unwrap();
    service.cancel(alice, bob).await.unwrap();
    assert!(service.get_friendship(alice, bob).await.unwrap().is_none());

    service.request(alice, bob).await.unwrap();
    service.reject(bob, alice).await.unwrap();

    service.request(bob, alice).await.unwrap();
    service.accept(alice, bob).await.unwrap();
    service.unfriend(alice, bob).await.unwrap();

    let fresh = service.request(alice, bob).await.unwrap();
    assert_eq!(fresh.status, FriendshipStatus::Pending);
    assert_eq!(fresh.requester, alice);
}

#[tokio::test]
async fn test_unblock_deletes_instead_of_restoring() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let service = &server.friendship_service;

    service.request(alice, bob).await.unwrap();
    service.accept(bob, alice).await.unwrap();
    service.block(alice, bob).await.unwrap();
    service.unblock(alice, bob).await.unwrap();

    assert!(service.get_friendship(alice, bob).await.unwrap().is_none());
    let err = service.unblock(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotFound), "got {err:?}");
}

#[tokio::test]
async fn test_disabled_requests_are_refused() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let service = &server.friendship_service;

    service.set_friend_requests_blocked(bob, true).await.unwrap();
    let err = service.request(alice, bob).await.unwrap_err();
    assert!(matches!(err, FriendshipError::NotAllowed(_)), "got {err:?}");

    // bob can still reach out
    service.request(bob, alice).await.unwrap();

    service.set_friend_requests_blocked(bob, false).await.unwrap();
    service.cancel(bob, alice).await.unwrap();
    service.request(alice, bob).await.unwrap();
}

#[tokio::test]
async fn test_unknown_counterpart() {
    let (server, users) = server_with_users(&["alice"]).await;

    let err = server
        .friendship_service
        .request(users[0], UserId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::UserNotFound), "got {err:?}");

    let err = server
        .friendship_service
        .set_friend_requests_blocked(UserId::new(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, FriendshipError::UserNotFound), "got {err:?}");
}

#[tokio::test]
async fn test_manage_dispatches_actions() {
    let (server, users) = server_with_users(&["alice", "bob"]).await;
    let (alice, bob) = (users[0], users[1]);
    let service = &server.friendship_service;

    let row = service
        .manage(alice, bob, FriendshipAction::Request)
        .await
        .unwrap();
    assert_eq!(row.map(|f| f.status), Some(FriendshipStatus::Pending));

    let row = service
        .manage(bob, alice, FriendshipAction::Accept)
        .await
        .unwrap();
    assert_eq!(row.map(|f| f.status), Some(FriendshipStatus::Friends));

    let row = service
        .manage(alice, bob, FriendshipAction::Unfriend)
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_friend_list_pages_without_overlap() {
    let (server, users) = server_with_users(&["alice", "bob", "carol", "dave"]).await;
    let alice = users[0];
    let service = &server.friendship_service;

    for other in &users[1..] {
        service.request(alice, *other).await.unwrap();
    }
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    service.accept(users[1], alice).await.unwrap();

    let first = service
        .list_friends(alice, PageSize(2), None)
        .await
        .unwrap();
    assert_eq!(first.len(), 2);
    let cursor = first.last().unwrap().cursor();
    let second = service
        .list_friends(alice, PageSize(2), Some(cursor))
        .await
        .unwrap();
    assert_eq!(second.len(), 1);

    let mut seen: Vec<UserId> = first.iter().chain(&second).map(|f| f.user_id).collect();
    seen.sort();
    let mut expected = users[1..].to_vec();
    expected.sort();
    assert_eq!(seen, expected);

    // the accepted row changed last, so it leads
    assert_eq!(first[0].user_id, users[1]);
    assert_eq!(first[0].status, FriendshipStatus::Friends);
    assert_eq!(first[0].username, "bob");
    assert!(!first[0].is_requester);
}
