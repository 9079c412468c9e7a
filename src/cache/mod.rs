// 缓存模块
// 读缓存接口、进程内与 Redis 两种后端、键命名空间

pub mod error;
pub mod keys;
pub mod memory;
pub mod operations;
pub mod redis_cache;
pub mod store;

use std::{sync::Arc, time::Duration};

use crate::config::{CacheBackend, Config};

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;
pub use store::ReadCache;

/// 应用中共享的缓存实例
pub type SharedCache = Arc<dyn ReadCache>;

/// 按配置构建缓存后端
pub fn from_config(config: &Config) -> Result<SharedCache, CacheError> {
    let ttl: Duration = config.cache_default_ttl();

    match (config.cache_backend, config.redis_url.as_deref()) {
        (CacheBackend::Redis, Some(url)) => {
            let client = ::redis::Client::open(url)?;
            tracing::info!("Using redis cache backend");
            Ok(Arc::new(RedisCache::new(Arc::new(client), ttl)))
        }
        (CacheBackend::Redis, None) => {
            tracing::warn!("CACHE_BACKEND=redis without REDIS_URL, falling back to memory cache");
            Ok(Arc::new(MemoryCache::new(ttl)))
        }
        (CacheBackend::Memory, _) => {
            tracing::info!("Using in-process memory cache backend");
            Ok(Arc::new(MemoryCache::new(ttl)))
        }
    }
}
