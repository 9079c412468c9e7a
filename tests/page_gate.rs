mod common;

use axum::http::StatusCode;
use lms::{
    auth::Role,
    gate::{Gate, GateMatcher, RouteTable},
};

use common::{
    body_string, get, location, send, test_app, test_app_with_gate, token_for, token_signed_with,
};

#[tokio::test]
async fn anonymous_dashboard_redirects_to_login_with_return_path() {
    let (app, _) = test_app();

    let response = send(&app, get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?redirect=%2Fdashboard")
    );
}

#[tokio::test]
async fn nested_protected_path_keeps_full_path() {
    let (app, _) = test_app();

    let response = send(&app, get("/dashboard/courses/rust-101", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?redirect=%2Fdashboard%2Fcourses%2Frust-101")
    );
}

#[tokio::test]
async fn token_with_wrong_secret_is_anonymous() {
    let (app, _) = test_app();
    let forged = token_signed_with(Role::Admin, "not-the-server-secret");

    let response = send(&app, get("/dashboard", Some(&forged))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?redirect=%2Fdashboard")
    );
}

#[tokio::test]
async fn malformed_cookie_is_anonymous() {
    let (app, _) = test_app();

    let response = send(&app, get("/dashboard", Some("garbage"))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn signed_in_user_sees_dashboard() {
    let (app, _) = test_app();
    let token = token_for(Role::Student);

    let response = send(&app, get("/dashboard", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("learner@example.com"));
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_auth_pages() {
    let (app, _) = test_app();

    for role in [Role::Student, Role::Admin] {
        let token = token_for(role);
        for path in ["/login", "/register"] {
            let response = send(&app, get(path, Some(&token))).await;
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(location(&response).as_deref(), Some("/dashboard"));
        }
    }
}

#[tokio::test]
async fn anonymous_user_can_open_login() {
    let (app, _) = test_app();

    let response = send(&app, get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn student_on_admin_page_goes_to_dashboard() {
    let (app, _) = test_app();
    let token = token_for(Role::Student);

    let response = send(&app, get("/admin", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn admin_passes_everywhere_it_is_allowed() {
    let (app, _) = test_app();
    let token = token_for(Role::Admin);

    assert_eq!(
        send(&app, get("/dashboard", Some(&token))).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        send(&app, get("/admin", Some(&token))).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn anonymous_admin_page_is_sent_to_login_by_handler() {
    let (app, _) = test_app();

    let response = send(&app, get("/admin", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response).as_deref(),
        Some("/login?redirect=%2Fadmin")
    );
}

#[tokio::test]
async fn admin_page_redirects_follow_the_route_table() {
    let table = RouteTable {
        login_path: "/signin".into(),
        landing_path: "/home".into(),
        ..RouteTable::default()
    };
    let (app, _) = test_app_with_gate(Gate::new(table, GateMatcher::default()));

    let response = send(&app, get("/admin", None)).await;
    assert_eq!(
        location(&response).as_deref(),
        Some("/signin?redirect=%2Fadmin")
    );

    let token = token_for(Role::Student);
    let response = send(&app, get("/admin", Some(&token))).await;
    assert_eq!(location(&response).as_deref(), Some("/home"));
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let (app, _) = test_app();

    let response = send(&app, get("/nowhere", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
