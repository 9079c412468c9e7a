use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
}

/// 用户视角的选课记录
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserEnrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_slug: String,
    pub course_title: String,
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
}

/// 课程视角的选课记录
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseEnrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub progress: i32,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub progress: i32,
}

impl UpdateProgressRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.progress) {
            return Err("学习进度必须在0到100之间".to_string());
        }
        Ok(())
    }
}

impl Enrollment {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (id, user_id, course_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, course_id, progress, enrolled_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
    }

    /// 只能更新自己的选课记录
    pub async fn update_progress(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        progress: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET progress = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, course_id, progress, enrolled_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(progress)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<UserEnrollment>, sqlx::Error> {
        sqlx::query_as::<_, UserEnrollment>(
            r#"
            SELECT e.id, e.course_id, c.slug AS course_slug, c.title AS course_title,
                   e.progress, e.enrolled_at
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.user_id = $1
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_course(
        pool: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollment>, sqlx::Error> {
        sqlx::query_as::<_, CourseEnrollment>(
            r#"
            SELECT e.id, e.user_id, u.email AS user_email, u.name AS user_name,
                   e.progress, e.enrolled_at
            FROM enrollments e
            JOIN users u ON u.id = e.user_id
            WHERE e.course_id = $1
            ORDER BY e.enrolled_at
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }
}
