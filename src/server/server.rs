use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::server::seed_users;
use crate::settings::{SeedUser, Settings};
use anyhow::anyhow;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Repository set of one storage backend.
struct Backend {
    tx_manager: Arc<dyn TxManager>,
    user_repo: Arc<dyn UserRepo>,
    friendship_repo: Arc<dyn FriendshipRepo>,
    card_repo: Arc<dyn CardRepo>,
    card_line_repo: Arc<dyn CardLineRepo>,
    tag_repo: Arc<dyn TagRepo>,
    suggestion_repo: Arc<dyn SuggestionRepo>,
}

impl Backend {
    fn memory() -> Self {
        Backend {
            tx_manager: Arc::new(MemoryTxManager::new()),
            user_repo: Arc::new(MemoryUserRepo),
            friendship_repo: Arc::new(MemoryFriendshipRepo),
            card_repo: Arc::new(MemoryCardRepo),
            card_line_repo: Arc::new(MemoryCardLineRepo),
            tag_repo: Arc::new(MemoryTagRepo),
            suggestion_repo: Arc::new(MemorySuggestionRepo),
        }
    }

    fn mysql(pool: MySqlPool) -> Self {
        Backend {
            tx_manager: Arc::new(MySqlTxManager::new(pool)),
            user_repo: Arc::new(MySqlUserRepo),
            friendship_repo: Arc::new(MySqlFriendshipRepo),
            card_repo: Arc::new(MySqlCardRepo),
            card_line_repo: Arc::new(MySqlCardLineRepo),
            tag_repo: Arc::new(MySqlTagRepo),
            suggestion_repo: Arc::new(MySqlSuggestionRepo),
        }
    }
}

pub struct Server {
    pub friendship_service: Arc<dyn FriendshipService>,
    pub card_service: Arc<dyn CardService>,
    pub suggestion_service: Arc<dyn SuggestionService>,
    pool: Option<MySqlPool>,
}

impl Server {
    /// Connects the configured backend, migrates it, seeds users and wires the services.
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (backend, pool) = match settings.store.backend.as_str() {
            "memory" => (Backend::memory(), None),
            "mysql" => {
                let dsn = settings
                    .store
                    .dsn
                    .as_deref()
                    .ok_or_else(|| anyhow!("store.dsn is required for the mysql backend"))?;
                let pool = connect(dsn, settings.store.max_connections).await?;
                run_migrations(&pool).await?;
                (Backend::mysql(pool.clone()), Some(pool))
            }
            other => return Err(anyhow!("Unknown store backend: {}", other)),
        };

        let server = Self::wire(backend, &settings.seed.users, pool).await?;
        info!("server started ({} backend)", settings.store.backend);
        Ok(server)
    }

    /// A server on a fresh in-memory store holding `users`.
    pub async fn in_memory(users: &[SeedUser]) -> anyhow::Result<Self> {
        Self::wire(Backend::memory(), users, None).await
    }

    async fn wire(
        backend: Backend,
        users: &[SeedUser],
        pool: Option<MySqlPool>,
    ) -> anyhow::Result<Self> {
        seed_users(&*backend.tx_manager, &*backend.user_repo, users).await?;

        let card_store = CardStore::new(
            backend.card_repo,
            backend.card_line_repo,
            backend.tag_repo,
        );

        let friendship_service: Arc<dyn FriendshipService> =
            Arc::new(RealFriendshipService::new(
                backend.user_repo.clone(),
                backend.friendship_repo,
                backend.tx_manager.clone(),
            ));
        let card_service: Arc<dyn CardService> = Arc::new(RealCardService::new(
            card_store.clone(),
            backend.tx_manager.clone(),
        ));
        let suggestion_service: Arc<dyn SuggestionService> =
            Arc::new(RealSuggestionService::new(
                backend.user_repo,
                backend.suggestion_repo,
                card_store,
                backend.tx_manager,
            ));

        Ok(Self {
            friendship_service,
            card_service,
            suggestion_service,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
        info!("server shut down");
    }
}
