use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient, aio::MultiplexedConnection};
use regex::Regex;

use super::{error::CacheResult, store::ReadCache};

/// 缓存键的统一前缀，避免与同一 Redis 中的其他数据冲突
pub const REDIS_KEY_PREFIX: &str = "lms:cache:";

/// 基于 Redis 的共享缓存，多实例部署时写入方的失效对所有实例可见。
pub struct RedisCache {
    redis: Arc<RedisClient>,
    default_ttl: Duration,
}

impl RedisCache {
    pub fn new(redis: Arc<RedisClient>, default_ttl: Duration) -> Self {
        Self { redis, default_ttl }
    }

    fn build_key(key: &str) -> String {
        format!("{}{}", REDIS_KEY_PREFIX, key)
    }

    async fn connection(&self) -> CacheResult<MultiplexedConnection> {
        Ok(self.redis.get_multiplexed_async_connection().await?)
    }

    /// 当前前缀下的全部键（带前缀）
    async fn prefixed_keys(conn: &mut MultiplexedConnection) -> CacheResult<Vec<String>> {
        let keys: Vec<String> = conn.keys(format!("{}*", REDIS_KEY_PREFIX)).await?;
        Ok(keys)
    }
}

/// PSETEX 不接受 0，超出 u64 的时长取上限
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl ReadCache for RedisCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(Self::build_key(key)).await?;
        Ok(value)
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let millis = ttl_millis(ttl.unwrap_or(self.default_ttl));
        let _: () = conn.pset_ex(Self::build_key(key), value, millis).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        let removed: usize = conn.del(Self::build_key(key)).await?;
        Ok(removed > 0)
    }

    async fn delete_pattern(&self, pattern: &Regex) -> CacheResult<usize> {
        let mut conn = self.connection().await?;

        // Redis 只支持 glob，正则匹配在客户端完成
        let matching: Vec<String> = Self::prefixed_keys(&mut conn)
            .await?
            .into_iter()
            .filter(|full| {
                full.strip_prefix(REDIS_KEY_PREFIX)
                    .is_some_and(|key| pattern.is_match(key))
            })
            .collect();

        if matching.is_empty() {
            return Ok(0);
        }

        let removed: usize = conn.del(&matching).await?;
        Ok(removed)
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let keys = Self::prefixed_keys(&mut conn).await?;
        if !keys.is_empty() {
            let _: usize = conn.del(&keys).await?;
        }
        Ok(())
    }

    fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            RedisCache::build_key("courses:detail:rust"),
            "lms:cache:courses:detail:rust"
        );
    }

    #[test]
    fn ttl_is_clamped_to_redis_range() {
        assert_eq!(ttl_millis(Duration::ZERO), 1);
        assert_eq!(ttl_millis(Duration::from_micros(500)), 1);
        assert_eq!(ttl_millis(Duration::from_secs(60)), 60_000);
        assert_eq!(ttl_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn construction_does_not_connect() {
        let client = RedisClient::open("redis://127.0.0.1:6399/").unwrap();
        let cache = RedisCache::new(Arc::new(client), Duration::from_secs(30));
        assert_eq!(cache.default_ttl(), Duration::from_secs(30));
    }
}
