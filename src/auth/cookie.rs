use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite};

/// 会话 Cookie 名称
pub const AUTH_COOKIE_NAME: &str = "auth-token";

/// 创建会话 Cookie，有效期与令牌一致
pub fn session_cookie(token: String, ttl: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(ttl.as_secs() as i64))
        .build()
}

/// 用于从 CookieJar 中移除会话
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME).path("/").build()
}
