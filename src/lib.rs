use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{cache::SharedCache, config::Config, gate::Gate};

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod result;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub cache: SharedCache,
    pub gate: Arc<Gate>,
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // 认证
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        // 课程
        .route(
            "/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route("/courses/categories", get(routes::courses::list_categories))
        .route(
            "/courses/{slug}",
            get(routes::courses::get_course)
                .put(routes::courses::update_course)
                .delete(routes::courses::delete_course),
        )
        // 选课
        .route(
            "/enrollments",
            get(routes::enrollments::my_enrollments).post(routes::enrollments::enroll),
        )
        .route(
            "/enrollments/{id}/progress",
            put(routes::enrollments::update_progress),
        )
        // 管理
        .route(
            "/admin/courses/{id}/enrollments",
            get(routes::enrollments::course_enrollments),
        )
        .route("/admin/stats", get(routes::admin::overview_stats))
        .route("/admin/cache", delete(routes::admin::clear_cache))
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(routes::pages::home))
        .route("/login", get(routes::pages::login_page))
        .route("/register", get(routes::pages::register_page))
        .route("/dashboard", get(routes::pages::dashboard))
        .route("/admin", get(routes::pages::admin_page))
}

/// 组装完整路由：API 与页面共用同一守卫层，API 路径由匹配规则排除
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .merge(page_routes())
        .fallback(routes::pages::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::route_gate,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::log_errors)),
        )
        .with_state(state)
}
