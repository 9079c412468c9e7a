use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::utils::is_valid_slug;

/// 每页课程数量
pub const PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<String>,
    pub page: Option<u32>,
}

impl CourseListQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePage {
    pub courses: Vec<Course>,
    pub page: u32,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCourseResponse {
    pub id: Uuid,
    pub slug: String,
}

fn validate_title(title: &str) -> Result<(), String> {
    let len = title.trim().chars().count();
    if len == 0 || len > 200 {
        return Err("课程标题长度必须在1到200个字符之间".to_string());
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<(), String> {
    let len = category.trim().chars().count();
    if len == 0 || len > 64 {
        return Err("课程分类长度必须在1到64个字符之间".to_string());
    }
    Ok(())
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_slug(&self.slug) {
            return Err("slug 只允许小写字母、数字和连字符".to_string());
        }
        validate_title(&self.title)?;
        validate_category(&self.category)
    }
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        Ok(())
    }
}

const COURSE_COLUMNS: &str =
    "id, slug, title, description, category, published, created_at, updated_at";

impl Course {
    pub async fn list_published(
        pool: &PgPool,
        category: Option<&str>,
        page: u32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let offset = (i64::from(page) - 1) * PAGE_SIZE;

        sqlx::query_as::<_, Course>(&format!(
            r#"
            SELECT {COURSE_COLUMNS}
            FROM courses
            WHERE published = true
              AND ($1::TEXT IS NULL OR category = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(category)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM courses
            WHERE published = true
            ORDER BY category
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, req: CreateCourseRequest) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (id, slug, title, description, category, published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&req.slug)
        .bind(req.title.trim())
        .bind(&req.description)
        .bind(req.category.trim())
        .bind(req.published)
        .fetch_one(pool)
        .await
    }

    /// 只更新请求中出现的字段
    pub async fn update(
        pool: &PgPool,
        slug: &str,
        req: UpdateCourseRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(&format!(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                published = COALESCE($5, published),
                updated_at = NOW()
            WHERE slug = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(slug)
        .bind(req.title.as_deref().map(str::trim))
        .bind(req.description)
        .bind(req.category.as_deref().map(str::trim))
        .bind(req.published)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(&format!(
            "DELETE FROM courses WHERE slug = $1 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
    }
}
