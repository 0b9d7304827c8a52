//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use yatube_infra::database::DatabaseConfig;

#[cfg(feature = "redis")]
use yatube_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub media_root: PathBuf,
    /// Bound on pages held by the in-memory cache.
    pub page_cache_entries: u64,
    pub site: SiteConfig,
}

/// Settings the request handlers read.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Where anonymous callers of protected routes are sent.
    pub login_url: String,
    /// Lifetime of a cached index page.
    pub index_cache_ttl: Duration,
    /// Largest request body accepted, form fields and image included.
    pub max_upload_bytes: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: "/auth/login/".to_string(),
            index_cache_ttl: Duration::from_secs(20),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_env("DB_MIN_CONNECTIONS").unwrap_or(10),
            sql_logging: parse_env("DB_SQL_LOGGING").unwrap_or(false),
        });

        let defaults = SiteConfig::default();
        let site = SiteConfig {
            login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
            index_cache_ttl: parse_env("INDEX_CACHE_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.index_cache_ttl),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT").unwrap_or(8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            page_cache_entries: parse_env("PAGE_CACHE_MAX_ENTRIES")
                .unwrap_or(yatube_infra::cache::DEFAULT_MAX_ENTRIES),
            site,
        }
    }
}
