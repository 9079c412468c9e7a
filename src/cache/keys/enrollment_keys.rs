use std::sync::LazyLock;

use regex::Regex;

/// 选课缓存键前缀
const ENROLLMENTS_PREFIX: &str = "enrollments:";

/// 用户选课缓存键前缀
const ENROLLMENTS_USER_PREFIX: &str = "enrollments:user:";

/// 课程选课缓存键前缀
const ENROLLMENTS_COURSE_PREFIX: &str = "enrollments:course:";

pub fn user_enrollments_key(user_id: &str) -> String {
    format!("{}{}", ENROLLMENTS_USER_PREFIX, user_id)
}

pub fn course_enrollments_key(course_id: &str) -> String {
    format!("{}{}", ENROLLMENTS_COURSE_PREFIX, course_id)
}

/// 全部选课缓存，课程被删除时使用
pub static ENROLLMENTS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}", ENROLLMENTS_PREFIX)).expect("valid regex"));
