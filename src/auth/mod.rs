//! 会话令牌、会话 Cookie 以及 API 层的身份提取器。

mod cookie;
mod extractor;
mod token;

pub use cookie::{AUTH_COOKIE_NAME, removal_cookie, session_cookie};
pub use extractor::{AdminUser, AuthUser};
pub use token::{Claims, Role, TokenError, issue_token, verify_token};
