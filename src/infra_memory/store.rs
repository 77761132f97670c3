use crate::domain_model::*;
use crate::domain_port::{StorageTx, TxManager};
use std::collections::BTreeMap;
use tokio::sync::{Mutex, MutexGuard};

/// Everything the in-memory backend persists.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub(super) users: BTreeMap<UserId, UserRecord>,
    pub(super) friendships: BTreeMap<UserPair, Friendship>,
    pub(super) cards: BTreeMap<CardId, CardRecord>,
    // insertion order per card
    pub(super) examples: BTreeMap<CardId, Vec<Example>>,
    pub(super) translations: BTreeMap<CardId, Vec<Translation>>,
    pub(super) tags: BTreeMap<TagText, TagId>,
    pub(super) card_tags: BTreeMap<(CardId, TagId), UserId>,
    pub(super) suggestions: BTreeMap<SuggestionId, CardSuggestion>,
}

/// Serializes transactions behind one async mutex.
///
/// A transaction edits a private copy of the state and publishes it on
/// commit, so rollback and drop leave the store untouched.
#[derive(Default)]
pub struct MemoryTxManager {
    state: Mutex<MemoryState>,
}

impl MemoryTxManager {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TxManager for MemoryTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let guard = self.state.lock().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx { guard, work }))
    }
}

pub struct MemoryTx<'t> {
    guard: MutexGuard<'t, MemoryState>,
    work: MemoryState,
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MemoryTx<'t> {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryTx { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Working copy of the transaction.
///
/// Only valid for transactions opened by [`MemoryTxManager`]; the server
/// never mixes backends.
pub(super) fn state<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MemoryState {
    // SAFETY: every repository of this backend is wired to a MemoryTxManager,
    // so the concrete type behind the trait object is always MemoryTx.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemoryTx<'t>;
        &mut (*p).work
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            user_id: UserId::new(),
            username: name.to_string(),
            friend_requests_blocked: false,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn commit_publishes_working_copy() {
        let manager = MemoryTxManager::new();
        let alice = user("alice");

        let mut tx = manager.begin().await.unwrap();
        state(&mut *tx).users.insert(alice.user_id, alice.clone());
        tx.commit().await.unwrap();

        let mut tx = manager.begin().await.unwrap();
        assert!(state(&mut *tx).users.contains_key(&alice.user_id));
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() {
        let manager = MemoryTxManager::new();
        let bob = user("bob");

        {
            let mut tx = manager.begin().await.unwrap();
            state(&mut *tx).users.insert(bob.user_id, bob.clone());
        }

        let mut tx = manager.begin().await.unwrap();
        assert!(state(&mut *tx).users.is_empty());
        tx.rollback().await.unwrap();
    }
}
