//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::Paginator;
use yatube_core::ports::{
    GroupRepository, PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_infra::{
    Argon2PasswordService, InMemoryGroupRepository, InMemoryPostRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};

#[cfg(feature = "postgres")]
use yatube_infra::{
    DatabaseConnections, PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub paginator: Paginator,
}

impl AppState {
    /// Build the application state, connecting to the database if one is configured.
    ///
    /// Falls back to in-memory storage when the connection fails.
    pub async fn new(config: &AppConfig) -> Self {
        let paginator = Paginator::new(config.posts_per_page);

        #[cfg(feature = "postgres")]
        let state = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let db = connections.main;
                    Self {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        groups: Arc::new(PostgresGroupRepository::new(db.clone())),
                        posts: Arc::new(PostgresPostRepository::new(db)),
                        tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
                        passwords: Arc::new(Argon2PasswordService::new()),
                        paginator,
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(paginator, config.jwt.clone())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(paginator, config.jwt.clone())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::in_memory(paginator, config.jwt.clone())
        };

        tracing::info!("Application state initialized");
        state
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(paginator: Paginator, jwt: JwtConfig) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            paginator,
        }
    }
}
