use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

/// 课程缓存键前缀，所有课程相关键都以此开头
const COURSES_PREFIX: &str = "courses:";

/// 课程列表缓存键前缀
const COURSE_LIST_PREFIX: &str = "courses:list:";

/// 课程详情缓存键前缀
const COURSE_DETAIL_PREFIX: &str = "courses:detail:";

/// 课程分类缓存键
pub const COURSE_CATEGORIES_KEY: &str = "courses:categories";

/// 课程写入后需要失效的全部键
pub static COURSES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}", COURSES_PREFIX)).expect("valid regex"));

/// 生成课程列表缓存键。
///
/// 未指定分类为 `courses:list:_:<page>`，指定分类为 `courses:list:c:<编码后的分类>:<page>`，
/// 两种形式互不重叠；分类经过百分号编码，不会带入 `:`。
pub fn course_list_key(category: Option<&str>, page: u32) -> String {
    match category {
        None => format!("{}_:{}", COURSE_LIST_PREFIX, page),
        Some(category) => {
            let encoded: String = form_urlencoded::byte_serialize(category.as_bytes()).collect();
            format!("{}c:{}:{}", COURSE_LIST_PREFIX, encoded, page)
        }
    }
}

/// 生成课程详情缓存键
pub fn course_detail_key(slug: &str) -> String {
    format!("{}{}", COURSE_DETAIL_PREFIX, slug)
}
