use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::{AdminUser, AuthUser, Claims},
    cache::{
        keys::{STATS_PATTERN, course_enrollments_key, user_enrollments_key},
        operations::{get_or_set, invalidate, invalidate_key},
    },
    error::{AppError, AppResult},
    result::ApiResult,
    routes::courses::Course,
    utils::success_to_api_response,
};

use super::model::{
    CourseEnrollment, EnrollRequest, Enrollment, UpdateProgressRequest, UserEnrollment,
};

fn user_uuid(claims: &Claims) -> AppResult<Uuid> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)
}

/// 选课变化后，失效该用户、该课程的选课缓存以及统计缓存
async fn invalidate_enrollment(state: &AppState, user_id: Uuid, course_id: Uuid) {
    invalidate_key(&*state.cache, &user_enrollments_key(&user_id.to_string())).await;
    invalidate_key(&*state.cache, &course_enrollments_key(&course_id.to_string())).await;
    invalidate(&*state.cache, &STATS_PATTERN).await;
}

#[axum::debug_handler]
pub async fn my_enrollments(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResult<Vec<UserEnrollment>>>> {
    let user_id = user_uuid(&claims)?;
    let pool = &state.pool;

    let enrollments = get_or_set(
        &*state.cache,
        &user_enrollments_key(&claims.sub),
        None,
        || async move { Ok::<_, AppError>(Enrollment::list_for_user(pool, user_id).await?) },
    )
    .await?;

    Ok(success_to_api_response(enrollments))
}

#[axum::debug_handler]
pub async fn enroll(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> AppResult<Json<ApiResult<Enrollment>>> {
    let user_id = user_uuid(&claims)?;

    // 只能选已发布的课程
    Course::find_by_id(&state.pool, req.course_id)
        .await?
        .filter(|c| c.published)
        .ok_or(AppError::NotFound)?;

    let enrollment = match Enrollment::create(&state.pool, user_id, req.course_id).await {
        Ok(enrollment) => enrollment,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict("已选过该课程".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    invalidate_enrollment(&state, user_id, req.course_id).await;

    tracing::info!("User {} enrolled in {}", user_id, req.course_id);
    Ok(success_to_api_response(enrollment))
}

#[axum::debug_handler]
pub async fn update_progress(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> AppResult<Json<ApiResult<Enrollment>>> {
    req.validate().map_err(AppError::Validation)?;
    let user_id = user_uuid(&claims)?;

    let enrollment = Enrollment::update_progress(&state.pool, id, user_id, req.progress)
        .await?
        .ok_or(AppError::NotFound)?;

    invalidate_enrollment(&state, user_id, enrollment.course_id).await;
    Ok(success_to_api_response(enrollment))
}

#[axum::debug_handler]
pub async fn course_enrollments(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ApiResult<Vec<CourseEnrollment>>>> {
    let pool = &state.pool;

    let enrollments = get_or_set(
        &*state.cache,
        &course_enrollments_key(&course_id.to_string()),
        None,
        || async move {
            Ok::<_, AppError>(Enrollment::list_for_course(pool, course_id).await?)
        },
    )
    .await?;

    Ok(success_to_api_response(enrollments))
}
