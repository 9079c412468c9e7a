/// 缓存键模块
/// 键命名空间由调用方约定，缓存本身不做校验

// 课程缓存键
pub mod course_keys;

// 选课缓存键
pub mod enrollment_keys;

// 统计缓存键
pub mod stats_keys;

pub use course_keys::{
    COURSE_CATEGORIES_KEY, COURSES_PATTERN, course_detail_key, course_list_key,
};
pub use enrollment_keys::{ENROLLMENTS_PATTERN, course_enrollments_key, user_enrollments_key};
pub use stats_keys::{STATS_PATTERN, stats_key};
