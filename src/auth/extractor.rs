use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};

use super::{AUTH_COOKIE_NAME, Claims, verify_token};
use crate::{AppState, error::AppError};

/// 已登录用户，API 处理器按需提取
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// 管理员用户
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

/// 优先读取会话 Cookie，其次读取 Bearer 头
async fn token_from_parts(parts: &mut Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = token_from_parts(parts)
            .await
            .ok_or(AppError::Unauthorized)?;

        let now = chrono::Utc::now().timestamp();
        match verify_token(&token, &state.config.jwt_secret, now) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(e) => {
                tracing::debug!("rejecting api token: {}", e);
                Err(AppError::Unauthorized)
            }
        }
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(claims))
    }
}
