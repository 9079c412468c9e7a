//! 带类型的缓存读写。
//!
//! 后端错误在这里被记录并降级：读失败按未命中处理，写失败只跳过写入。
//! 加载函数的错误原样返回给调用方，且不会被缓存。

use std::{future::Future, time::Duration};

use regex::Regex;
use serde::{Serialize, de::DeserializeOwned};

use super::store::ReadCache;

/// 读取并反序列化；不存在、过期或无法解析都返回 `None`
pub async fn get<C, T>(cache: &C, key: &str) -> Option<T>
where
    C: ReadCache + ?Sized,
    T: DeserializeOwned,
{
    match cache.get_json(key).await {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("discarding undecodable cache entry {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("cache read failed for {}: {}", key, e);
            None
        }
    }
}

/// 序列化并写入
pub async fn set<C, T>(cache: &C, key: &str, value: &T, ttl: Option<Duration>)
where
    C: ReadCache + ?Sized,
    T: Serialize,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("cache value for {} is not serializable: {}", key, e);
            return;
        }
    };

    if let Err(e) = cache.set_json(key, json, ttl).await {
        tracing::warn!("cache write failed for {}: {}", key, e);
    }
}

/// 命中则直接返回，否则调用加载函数并写入缓存。
///
/// 同一键的并发未命中各自调用加载函数。
pub async fn get_or_set<C, T, E, F, Fut>(
    cache: &C,
    key: &str,
    ttl: Option<Duration>,
    loader: F,
) -> Result<T, E>
where
    C: ReadCache + ?Sized,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = get(cache, key).await {
        tracing::debug!("cache hit: {}", key);
        return Ok(value);
    }

    tracing::debug!("cache miss: {}", key);
    let value = loader().await?;
    set(cache, key, &value, ttl).await;
    Ok(value)
}

/// 按正则批量失效，返回删除数量
pub async fn invalidate<C>(cache: &C, pattern: &Regex) -> usize
where
    C: ReadCache + ?Sized,
{
    match cache.delete_pattern(pattern).await {
        Ok(removed) => {
            tracing::debug!("invalidated {} cache entries matching {}", removed, pattern);
            removed
        }
        Err(e) => {
            tracing::warn!("cache invalidation failed for {}: {}", pattern, e);
            0
        }
    }
}

/// 删除单个键
pub async fn invalidate_key<C>(cache: &C, key: &str) -> bool
where
    C: ReadCache + ?Sized,
{
    match cache.delete(key).await {
        Ok(existed) => existed,
        Err(e) => {
            tracing::warn!("cache delete failed for {}: {}", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use serde::Deserialize;

    use super::*;
    use crate::cache::MemoryCache;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Course {
        slug: String,
        title: String,
    }

    fn course() -> Course {
        Course {
            slug: "rust".into(),
            title: "Rust 入门".into(),
        }
    }

    #[tokio::test]
    async fn get_or_set_loads_once_then_hits() {
        let cache = MemoryCache::default();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let loaded: Result<Course, String> =
                get_or_set(&cache, "courses:detail:rust", None, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(course())
                })
                .await;
            assert_eq!(loaded.unwrap(), course());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_loader_leaves_nothing_behind() {
        let cache = MemoryCache::default();

        let result: Result<Course, String> =
            get_or_set(&cache, "courses:detail:missing", None, || async {
                Err("db down".to_string())
            })
            .await;

        assert_eq!(result.unwrap_err(), "db down");
        assert!(get::<_, Course>(&cache, "courses:detail:missing").await.is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn get_or_set_reloads_after_expiry() {
        let cache = MemoryCache::default();
        let ttl = Some(Duration::from_millis(10));

        let first: Result<u32, String> =
            get_or_set(&cache, "stats:users", ttl, || async { Ok(1) }).await;
        assert_eq!(first.unwrap(), 1);

        tokio::time::advance(Duration::from_millis(11)).await;
        let second: Result<u32, String> =
            get_or_set(&cache, "stats:users", ttl, || async { Ok(2) }).await;
        assert_eq!(second.unwrap(), 2);
    }

    #[tokio::test]
    async fn undecodable_entry_is_treated_as_miss() {
        let cache = MemoryCache::default();
        cache.set("courses:categories", "not json".into(), None);

        let loaded: Result<Vec<String>, String> =
            get_or_set(&cache, "courses:categories", None, || async {
                Ok(vec!["systems".to_string()])
            })
            .await;
        assert_eq!(loaded.unwrap(), vec!["systems".to_string()]);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let cache: Arc<dyn ReadCache> = Arc::new(MemoryCache::default());
        set(&*cache, "courses:list:_:1", &vec![course()], None).await;
        set(&*cache, "enrollments:user:u1", &Vec::<Course>::new(), None).await;

        let pattern = Regex::new("^courses:").unwrap();
        assert_eq!(invalidate(&*cache, &pattern).await, 1);
        assert!(get::<_, Vec<Course>>(&*cache, "courses:list:_:1").await.is_none());
        assert!(invalidate_key(&*cache, "enrollments:user:u1").await);
    }
}
