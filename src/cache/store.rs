use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::error::CacheResult;

/// 读缓存的存储接口。
///
/// 值以 JSON 字符串保存，对缓存本身不透明。`ttl` 为 `None` 时使用
/// 后端的默认有效期。缓存只影响性能：内容丢失不能改变程序行为。
#[async_trait]
pub trait ReadCache: Send + Sync {
    /// 读取未过期的条目；已过期的条目视为不存在。
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>>;

    /// 无条件覆盖写入。
    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    /// 删除单个键，返回该键此前是否存在。
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// 删除所有匹配正则的键，返回删除数量。线性扫描。
    async fn delete_pattern(&self, pattern: &Regex) -> CacheResult<usize>;

    /// 清空全部条目。
    async fn clear(&self) -> CacheResult<()>;

    fn default_ttl(&self) -> Duration;
}
