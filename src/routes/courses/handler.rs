use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    AppState,
    auth::AdminUser,
    cache::{
        ReadCache,
        keys::{
            COURSE_CATEGORIES_KEY, COURSES_PATTERN, ENROLLMENTS_PATTERN, STATS_PATTERN,
            course_detail_key, course_list_key,
        },
        operations::{get_or_set, invalidate},
    },
    error::{AppError, AppResult},
    result::ApiResult,
    utils::success_to_api_response,
};

use super::model::{
    Course, CourseListQuery, CoursePage, CreateCourseRequest, DeleteCourseResponse, PAGE_SIZE,
    UpdateCourseRequest,
};

#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> AppResult<Json<ApiResult<CoursePage>>> {
    let page = query.page();
    let category = query.category();
    let key = course_list_key(category, page);

    let pool = &state.pool;
    let courses = get_or_set(&*state.cache, &key, None, || async move {
        Ok::<_, AppError>(Course::list_published(pool, category, page).await?)
    })
    .await?;

    Ok(success_to_api_response(CoursePage {
        courses,
        page,
        page_size: PAGE_SIZE,
    }))
}

#[axum::debug_handler]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResult<Vec<String>>>> {
    let pool = &state.pool;
    let categories = get_or_set(&*state.cache, COURSE_CATEGORIES_KEY, None, || async move {
        Ok::<_, AppError>(Course::categories(pool).await?)
    })
    .await?;

    Ok(success_to_api_response(categories))
}

/// 课程详情；不存在时返回 404 且不写缓存
#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResult<Course>>> {
    let pool = &state.pool;
    let slug = slug.as_str();
    let course = get_or_set(&*state.cache, &course_detail_key(slug), None, || async move {
        Course::find_by_slug(pool, slug)
            .await?
            .filter(|c| c.published)
            .ok_or(AppError::NotFound)
    })
    .await?;

    Ok(success_to_api_response(course))
}

/// 课程写入后的缓存失效：课程与统计键全部删除，删除课程时选课键一并失效
pub(crate) async fn invalidate_course_writes(cache: &dyn ReadCache, cascade_enrollments: bool) {
    invalidate(cache, &COURSES_PATTERN).await;
    if cascade_enrollments {
        invalidate(cache, &ENROLLMENTS_PATTERN).await;
    }
    invalidate(cache, &STATS_PATTERN).await;
}

#[axum::debug_handler]
pub async fn create_course(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> AppResult<Json<ApiResult<Course>>> {
    req.validate().map_err(AppError::Validation)?;

    let course = match Course::create(&state.pool, req).await {
        Ok(course) => course,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict("课程 slug 已存在".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    invalidate_course_writes(&*state.cache, false).await;

    tracing::info!("Course {} created by {}", course.slug, admin.sub);
    Ok(success_to_api_response(course))
}

#[axum::debug_handler]
pub async fn update_course(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> AppResult<Json<ApiResult<Course>>> {
    req.validate().map_err(AppError::Validation)?;

    let course = Course::update(&state.pool, &slug, req)
        .await?
        .ok_or(AppError::NotFound)?;

    invalidate_course_writes(&*state.cache, false).await;

    tracing::info!("Course {} updated by {}", course.slug, admin.sub);
    Ok(success_to_api_response(course))
}

/// 删除课程会级联删除选课记录，因此选课缓存一并失效
#[axum::debug_handler]
pub async fn delete_course(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResult<DeleteCourseResponse>>> {
    let course = Course::delete(&state.pool, &slug)
        .await?
        .ok_or(AppError::NotFound)?;

    invalidate_course_writes(&*state.cache, true).await;

    tracing::info!("Course {} deleted by {}", course.slug, admin.sub);
    Ok(success_to_api_response(DeleteCourseResponse {
        id: course.id,
        slug: course.slug,
    }))
}
