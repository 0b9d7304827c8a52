//! Cache implementations - Redis and in-memory fallback.

mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use memory::{DEFAULT_MAX_ENTRIES, InMemoryCache};
#[cfg(feature = "redis")]
pub use self::redis::{RedisCache, RedisConfig};
