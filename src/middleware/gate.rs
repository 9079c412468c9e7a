use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    auth::AUTH_COOKIE_NAME,
    gate::{Decision, PageSession},
};

/// 页面路由守卫。
///
/// 放行时把 `PageSession` 放入请求扩展，供页面处理器读取。
pub async fn route_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if !state.gate.applies_to(&path) {
        return next.run(req).await;
    }

    let now = chrono::Utc::now().timestamp();
    let token = jar.get(AUTH_COOKIE_NAME).map(|c| c.value().to_owned());
    let session = state
        .gate
        .authenticate(token.as_deref(), &state.config.jwt_secret, now);

    match state.gate.decide(&path, session.as_ref()) {
        Decision::Allow => {
            req.extensions_mut().insert(PageSession(session));
            next.run(req).await
        }
        Decision::Redirect(location) => Redirect::temporary(&location).into_response(),
    }
}

/// 页面处理器读取守卫结果；未经过守卫的请求视为匿名
impl<S> FromRequestParts<S> for PageSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<PageSession>()
            .cloned()
            .unwrap_or_default())
    }
}
