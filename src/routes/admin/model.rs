use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OverviewStats {
    pub users: i64,
    pub courses: i64,
    pub published_courses: i64,
    pub enrollments: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearCacheResponse {}

impl OverviewStats {
    pub async fn load(pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, OverviewStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM courses) AS courses,
                (SELECT COUNT(*) FROM courses WHERE published = true) AS published_courses,
                (SELECT COUNT(*) FROM enrollments) AS enrollments
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
