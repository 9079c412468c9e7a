use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use regex::Regex;
use tokio::time::Instant;

use super::{error::CacheResult, store::ReadCache};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// 进程内缓存。
///
/// 过期条目只在 `get` 或 `delete_pattern` 触及时才被物理删除，没有后台清理。
/// 锁从不跨越 `.await` 持有。
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    pub fn set(&self, key: &str, value: String, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.lock()
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// 已过期但尚未清理的条目视为不存在，删除后返回 `false`
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// 匹配的键全部删除并计数；扫描途中顺带丢弃已过期的非匹配条目。
    pub fn delete_pattern(&self, pattern: &Regex) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.lock().retain(|key, entry| {
            if pattern.is_match(key) {
                removed += 1;
                false
            } else {
                !entry.is_expired(now)
            }
        });

        removed
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// 物理存储的条目数，包含尚未被清理的过期条目。
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadCache for MemoryCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.get(key))
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        self.set(key, value, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(MemoryCache::delete(self, key))
    }

    async fn delete_pattern(&self, pattern: &Regex) -> CacheResult<usize> {
        Ok(MemoryCache::delete_pattern(self, pattern))
    }

    async fn clear(&self) -> CacheResult<()> {
        MemoryCache::clear(self);
        Ok(())
    }

    fn default_ttl(&self) -> Duration {
        self.default_ttl
    }
}
