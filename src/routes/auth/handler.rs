use axum::{
    Json,
    extract::State,
};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    auth::{AuthUser, issue_token, removal_cookie, session_cookie},
    error::{AppError, AppResult},
    result::ApiResult,
    utils::{hash_password, success_to_api_response, verify_password},
};

use super::model::{
    AuthResponse, LoginRequest, LogoutResponse, MeResponse, RegisterRequest, User,
};

/// 签发令牌并写入会话 Cookie
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> AppResult<(CookieJar, Json<ApiResult<AuthResponse>>)> {
    let ttl = state.config.jwt_expiration();
    let (token, expires_at) = issue_token(
        &user.id.to_string(),
        &user.email,
        user.role(),
        &state.config.jwt_secret,
        ttl,
        chrono::Utc::now().timestamp(),
    )?;

    let jar = jar.add(session_cookie(
        token.clone(),
        ttl,
        state.config.secure_cookies,
    ));

    Ok((
        jar,
        success_to_api_response(AuthResponse {
            user: user.profile(),
            token,
            expires_at,
        }),
    ))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(CookieJar, Json<ApiResult<AuthResponse>>)> {
    req.validate().map_err(AppError::Validation)?;

    let email = req.email.trim().to_lowercase();
    let password_hash = hash_password(&req.password)?;

    let user = match User::create(
        &state.pool,
        &email,
        req.name.trim(),
        &password_hash,
        crate::auth::Role::Student,
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict("用户已存在".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Registered user {}", user.id);
    start_session(&state, jar, &user)
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResult<AuthResponse>>)> {
    let email = req.email.trim().to_lowercase();
    let user = User::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::debug!("Password mismatch for {}", user.id);
        return Err(AppError::Unauthorized);
    }

    start_session(&state, jar, &user)
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResult<LogoutResponse>>) {
    (
        jar.remove(removal_cookie()),
        success_to_api_response(LogoutResponse {}),
    )
}

/// 令牌已由提取器验证，直接返回其中的身份
#[axum::debug_handler(state = AppState)]
pub async fn me(AuthUser(claims): AuthUser) -> Json<ApiResult<MeResponse>> {
    success_to_api_response(MeResponse {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
        expires_at: claims.exp,
    })
}
