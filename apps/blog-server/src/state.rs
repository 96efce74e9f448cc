//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use blog_core::services::{AccountService, PostService};
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
    JwtConfig, JwtTokenService,
};

use crate::config::{AppConfig, DEFAULT_FORM_LIMIT_BYTES};

/// Session cookie settings.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub secure: bool,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub session: SessionSettings,
    /// Body limit for urlencoded forms.
    pub form_limit_bytes: usize,
    /// Which store backs the repositories, reported by the health check.
    pub storage: &'static str,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>);

fn in_memory_repositories() -> Repositories {
    let store = InMemoryStore::new();
    (
        Arc::new(InMemoryPostRepository::new(store.clone())),
        Arc::new(InMemoryUserRepository::new(store)),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (storage, (posts, users)) = Self::repositories(config).await;

        let mut state = Self::assemble(
            posts,
            users,
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            Arc::new(Argon2PasswordService::new()),
            SessionSettings {
                secure: config.session_cookie_secure,
            },
            storage,
        );
        state.form_limit_bytes = config.form_limit_bytes;

        tracing::info!(storage, "Application state initialized");
        state
    }

    /// In-memory state with the given token settings and password hasher.
    pub fn in_memory(jwt: JwtConfig, passwords: Arc<dyn PasswordService>) -> Self {
        let (posts, users) = in_memory_repositories();
        Self::assemble(
            posts,
            users,
            Arc::new(JwtTokenService::new(jwt)),
            passwords,
            SessionSettings::default(),
            "memory",
        )
    }

    fn assemble(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        session: SessionSettings,
        storage: &'static str,
    ) -> Self {
        Self {
            posts: PostService::new(posts, users.clone()),
            accounts: AccountService::new(users, passwords),
            tokens,
            session,
            form_limit_bytes: DEFAULT_FORM_LIMIT_BYTES,
            storage,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (&'static str, Repositories) {
        use blog_infra::database::{
            DatabaseConnections, PostgresPostRepository, PostgresUserRepository,
        };
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return ("memory", in_memory_repositories());
        };

        let connections = match DatabaseConnections::init(db_config).await {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return ("memory", in_memory_repositories());
            }
        };

        if config.run_migrations {
            if let Err(e) = Migrator::up(&connections.main, None).await {
                tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
                return ("memory", in_memory_repositories());
            }
            tracing::info!("Database migrations applied");
        }

        let posts: Arc<dyn PostRepository> =
            Arc::new(PostgresPostRepository::new(connections.main.clone()));
        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(connections.main));
        ("postgres", (posts, users))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (&'static str, Repositories) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        ("memory", in_memory_repositories())
    }
}
