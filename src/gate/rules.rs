use std::fmt;

use super::routes::RouteClass;
use crate::auth::Claims;

/// 单次请求的守卫输入
#[derive(Debug, Clone, Copy)]
pub struct GateContext<'a> {
    pub path: &'a str,
    pub class: RouteClass,
    pub session: Option<&'a Claims>,
}

impl GateContext<'_> {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_some_and(Claims::is_admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 跳转登录页并带上原路径
    RedirectToLogin,
    /// 跳转默认落地页
    RedirectToLanding,
}

/// (条件, 结果) 规则
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&GateContext<'_>) -> bool,
    pub outcome: Outcome,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish()
    }
}

/// 默认规则，顺序即优先级
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "protected-requires-session",
            applies: |ctx| ctx.class.protected && !ctx.is_authenticated(),
            outcome: Outcome::RedirectToLogin,
        },
        Rule {
            name: "auth-only-rejects-session",
            applies: |ctx| ctx.class.auth_only && ctx.is_authenticated(),
            outcome: Outcome::RedirectToLanding,
        },
        Rule {
            name: "admin-requires-admin-role",
            applies: |ctx| ctx.is_authenticated() && ctx.class.admin_restricted && !ctx.is_admin(),
            outcome: Outcome::RedirectToLanding,
        },
    ]
}

/// 自上而下求值，返回第一条命中的规则
pub fn evaluate<'r>(rules: &'r [Rule], ctx: &GateContext<'_>) -> Option<&'r Rule> {
    rules.iter().find(|rule| (rule.applies)(ctx))
}
