use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

/// 缓存后端错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
