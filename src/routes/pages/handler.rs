use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::{AppState, gate::PageSession};

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape_html(title),
        body
    ))
}

fn login_redirect(state: &AppState, path: &str) -> Response {
    Redirect::temporary(&state.gate.login_location(path)).into_response()
}

pub async fn home(session: PageSession) -> Html<String> {
    let nav = match session.0 {
        Some(claims) => format!(
            "<p>{}</p><a href=\"/dashboard\">我的课程</a>",
            escape_html(&claims.email)
        ),
        None => "<a href=\"/login\">登录</a> <a href=\"/register\">注册</a>".to_string(),
    };
    layout("课程中心", &format!("<h1>课程中心</h1>{}", nav))
}

pub async fn login_page() -> Html<String> {
    layout(
        "登录",
        "<h1>登录</h1><form method=\"post\" action=\"/api/auth/login\"></form>",
    )
}

pub async fn register_page() -> Html<String> {
    layout(
        "注册",
        "<h1>注册</h1><form method=\"post\" action=\"/api/auth/register\"></form>",
    )
}

pub async fn dashboard(State(state): State<AppState>, session: PageSession) -> Response {
    let Some(claims) = session.0 else {
        return login_redirect(&state, "/dashboard");
    };

    let admin_link = if claims.is_admin() {
        "<a href=\"/admin\">管理后台</a>"
    } else {
        ""
    };

    layout(
        "我的课程",
        &format!(
            "<h1>我的课程</h1><p>{}</p>{}",
            escape_html(&claims.email),
            admin_link
        ),
    )
    .into_response()
}

/// 守卫只拦截已登录的非管理员，匿名访问在这里处理
pub async fn admin_page(State(state): State<AppState>, session: PageSession) -> Response {
    match session.0 {
        None => login_redirect(&state, "/admin"),
        Some(claims) if !claims.is_admin() => {
            Redirect::temporary(state.gate.landing_location()).into_response()
        }
        Some(claims) => layout(
            "管理后台",
            &format!("<h1>管理后台</h1><p>{}</p>", escape_html(&claims.email)),
        )
        .into_response(),
    }
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, layout("页面不存在", "<h1>404</h1>"))
}
