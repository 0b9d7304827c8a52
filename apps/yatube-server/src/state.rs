//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    Cache, MediaStorage, PasswordService, Repositories, TokenService, UserRepository,
};
use yatube_core::services::{CommentService, FollowService, PostService};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService,
    LocalMediaStorage,
};

use crate::config::{AppConfig, SiteConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub users: Arc<dyn UserRepository>,
    pub cache: Arc<dyn Cache>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub site: SiteConfig,
    /// Which store backs the repositories, for the health probe.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let (repos, storage) = repositories(config).await?;
        let cache = page_cache(config).await?;
        let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(&config.media_root));
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig::from_env()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!(
            storage,
            media_root = %config.media_root.display(),
            "Application state initialized"
        );

        let mut state =
            Self::from_parts(repos, cache, media, tokens, passwords, config.site.clone());
        state.storage = storage;
        Ok(state)
    }

    /// Assemble the state from ready-made adapters.
    pub fn from_parts(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        media: Arc<dyn MediaStorage>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
        site: SiteConfig,
    ) -> Self {
        Self {
            posts: PostService::new(repos.clone(), media),
            comments: CommentService::new(repos.clone()),
            follows: FollowService::new(repos.clone()),
            users: repos.users,
            cache,
            tokens,
            passwords,
            site,
            storage: "memory",
        }
    }
}

#[cfg(feature = "postgres")]
async fn repositories(config: &AppConfig) -> anyhow::Result<(Repositories, &'static str)> {
    use anyhow::Context;
    use migration::{Migrator, MigratorTrait};
    use yatube_infra::DatabaseConnections;

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Ok((InMemoryStore::new().repositories(), "memory"));
    };

    let connections = DatabaseConnections::init(db_config)
        .await
        .context("failed to connect to the database")?;

    if config.run_migrations {
        Migrator::up(&connections.main, None)
            .await
            .context("failed to apply migrations")?;
        tracing::info!("Migrations applied");
    }

    Ok((connections.repositories(), "postgres"))
}

#[cfg(not(feature = "postgres"))]
async fn repositories(config: &AppConfig) -> anyhow::Result<(Repositories, &'static str)> {
    if config.database.is_some() || config.run_migrations {
        tracing::warn!("Database settings are ignored: the postgres feature is disabled");
    }
    tracing::info!("Running without postgres feature - using in-memory repositories");
    Ok((InMemoryStore::new().repositories(), "memory"))
}

#[cfg(feature = "redis")]
async fn page_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    use yatube_infra::RedisCache;

    let Some(redis_config) = config.redis.clone() else {
        return Ok(memory_cache(config));
    };

    let fallback = redis_config.fallback_to_memory;
    match RedisCache::new(redis_config).await {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) if fallback => {
            tracing::error!("Failed to connect to Redis: {}. Using in-memory cache.", e);
            Ok(memory_cache(config))
        }
        Err(e) => Err(anyhow::anyhow!("failed to connect to Redis: {e}")),
    }
}

#[cfg(not(feature = "redis"))]
async fn page_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    Ok(memory_cache(config))
}

fn memory_cache(config: &AppConfig) -> Arc<dyn Cache> {
    Arc::new(InMemoryCache::with_max_entries(config.page_cache_entries))
}
