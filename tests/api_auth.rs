mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use lms::{
    auth::Role,
    cache::{
        ReadCache,
        keys::{course_detail_key, course_list_key, stats_key},
    },
    result::ApiResult,
    routes::{admin::OverviewStats, auth::MeResponse},
};
use serde_json::json;

use common::{body_string, get, send, test_app, token_for};

fn with_bearer(method: &str, path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn api_paths_are_not_redirected_by_gate() {
    let (app, _) = test_app();

    let response = send(&app, get("/api/auth/me", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: ApiResult<serde_json::Value> =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.code, 1002);
    assert!(body.data.is_none());
}

#[tokio::test]
async fn me_accepts_cookie_or_bearer() {
    let (app, _) = test_app();
    let token = token_for(Role::Student);

    let response = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, with_bearer("GET", "/api/auth/me", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResult<MeResponse> = serde_json::from_str(&body_string(response).await).unwrap();
    let me = body.data.unwrap();
    assert_eq!(me.email, "learner@example.com");
    assert_eq!(me.role, Role::Student);
}

#[tokio::test]
async fn logout_clears_session_cookie() {
    let (app, _) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header("cookie", format!("auth-token={}", token_for(Role::Student)))
        .body(Body::empty())
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("auth-token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn admin_endpoints_reject_students() {
    let (app, _) = test_app();
    let token = token_for(Role::Student);

    let response = send(&app, with_bearer("DELETE", "/api/admin/cache", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, with_bearer("GET", "/api/admin/stats", &token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_clear_cache() {
    let (app, cache) = test_app();
    cache.set("courses:categories", "[\"systems\"]".into(), None);

    let token = token_for(Role::Admin);
    let response = send(&app, with_bearer("DELETE", "/api/admin/cache", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn cached_stats_are_served_without_database() {
    let (app, cache) = test_app();
    let stats = OverviewStats {
        users: 3,
        courses: 2,
        published_courses: 1,
        enrollments: 4,
    };
    cache
        .set_json(&stats_key("overview"), serde_json::to_string(&stats).unwrap(), None)
        .await
        .unwrap();

    let token = token_for(Role::Admin);
    let response = send(&app, with_bearer("GET", "/api/admin/stats", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResult<OverviewStats> =
        serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.data.unwrap(), stats);
}

#[tokio::test]
async fn cached_course_detail_is_public() {
    let (app, cache) = test_app();
    let course = json!({
        "id": "0b6f0b7a-7a59-4cf0-9d3a-3c2f6f4b1e11",
        "slug": "rust-101",
        "title": "Rust 101",
        "description": "",
        "category": "systems",
        "published": true,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z"
    });
    cache.set(&course_detail_key("rust-101"), course.to_string(), None);

    let response = send(&app, get("/api/courses/rust-101", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["slug"], "rust-101");
}

#[tokio::test]
async fn category_named_all_does_not_share_the_unfiltered_list() {
    let (app, cache) = test_app();
    let systems = json!({
        "id": "0b6f0b7a-7a59-4cf0-9d3a-3c2f6f4b1e11",
        "slug": "rust-101",
        "title": "Rust 101",
        "description": "",
        "category": "systems",
        "published": true,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z"
    });
    cache.set(
        &course_list_key(None, 1),
        json!({ "courses": [systems], "page": 1, "page_size": 20 }).to_string(),
        None,
    );
    cache.set(
        &course_list_key(Some("all"), 1),
        json!({ "courses": [], "page": 1, "page_size": 20 }).to_string(),
        None,
    );

    let response = send(&app, get("/api/courses", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["data"]["courses"][0]["category"], "systems");

    let response = send(&app, get("/api/courses?category=all", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["data"]["courses"], json!([]));
}
