//! 页面请求的身份认证与授权守卫。
//!
//! 守卫是 (路径, 令牌, 密钥, 当前时间) 的纯函数：要么放行，要么重定向。
//! 令牌校验失败一律视为未登录，不会向外抛出错误。

mod routes;
mod rules;

use url::form_urlencoded;

use crate::auth::{Claims, verify_token};

pub use routes::{DEFAULT_EXCLUSION, GateMatcher, RouteClass, RouteTable, first_match};
pub use rules::{GateContext, Outcome, Rule, default_rules, evaluate};

/// 守卫放行后附加到请求上的会话
#[derive(Debug, Clone, Default)]
pub struct PageSession(pub Option<Claims>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct Gate {
    table: RouteTable,
    matcher: GateMatcher,
    rules: Vec<Rule>,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(RouteTable::default(), GateMatcher::default())
    }
}

impl Gate {
    pub fn new(table: RouteTable, matcher: GateMatcher) -> Self {
        Self {
            table,
            matcher,
            rules: default_rules(),
        }
    }

    pub fn applies_to(&self, path: &str) -> bool {
        self.matcher.applies_to(path)
    }

    /// 校验令牌；任何失败都返回 `None`
    pub fn authenticate(&self, token: Option<&str>, secret: &str, now: i64) -> Option<Claims> {
        let token = token?;
        match verify_token(token, secret, now) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!("gate treating request as anonymous: {}", e);
                None
            }
        }
    }

    /// 对已认证结果求值
    pub fn decide(&self, path: &str, session: Option<&Claims>) -> Decision {
        let ctx = GateContext {
            path,
            class: self.table.classify(path),
            session,
        };

        match evaluate(&self.rules, &ctx) {
            Some(rule) => {
                tracing::debug!("gate rule {} matched {}", rule.name, path);
                Decision::Redirect(self.location(rule.outcome, path))
            }
            None => Decision::Allow,
        }
    }

    /// 完整的守卫判定：匹配范围外的路径直接放行
    pub fn check(&self, path: &str, token: Option<&str>, secret: &str, now: i64) -> Decision {
        if !self.applies_to(path) {
            return Decision::Allow;
        }
        let session = self.authenticate(token, secret, now);
        self.decide(path, session.as_ref())
    }

    /// 登录页地址，原路径放在 `redirect` 参数中
    pub fn login_location(&self, path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", path)
            .finish();
        format!("{}?{}", self.table.login_path, query)
    }

    pub fn landing_location(&self) -> &str {
        &self.table.landing_path
    }

    fn location(&self, outcome: Outcome, path: &str) -> String {
        match outcome {
            Outcome::RedirectToLogin => self.login_location(path),
            Outcome::RedirectToLanding => self.landing_location().to_string(),
        }
    }
}
