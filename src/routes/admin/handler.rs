use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::AdminUser,
    cache::{keys::stats_key, operations::get_or_set},
    error::{AppError, AppResult},
    result::ApiResult,
    utils::success_to_api_response,
};

use super::model::{ClearCacheResponse, OverviewStats};

#[axum::debug_handler]
pub async fn overview_stats(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResult<OverviewStats>>> {
    let pool = &state.pool;

    let stats = get_or_set(&*state.cache, &stats_key("overview"), None, || async move {
        Ok::<_, AppError>(OverviewStats::load(pool).await?)
    })
    .await?;

    Ok(success_to_api_response(stats))
}

#[axum::debug_handler]
pub async fn clear_cache(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResult<ClearCacheResponse>>> {
    state
        .cache
        .clear()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("Cache cleared by {}", admin.sub);
    Ok(success_to_api_response(ClearCacheResponse {}))
}
