use std::sync::LazyLock;

use regex::Regex;

const STATS_PREFIX: &str = "stats:";

pub static STATS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}", STATS_PREFIX)).expect("valid regex"));

/// 生成统计缓存键，如 `stats:overview`
pub fn stats_key(kind: &str) -> String {
    format!("{}{}", STATS_PREFIX, kind)
}
