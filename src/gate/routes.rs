use regex::Regex;

/// 不经过路由守卫的路径：API、静态资源、框架内部路径和图片优化路径
pub const DEFAULT_EXCLUSION: &str =
    r"^/(?:api|_next/static|_next/image|static)(?:/|$)|^/favicon\.ico$";

/// 静态路由分类表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    /// 需要登录
    pub protected: Vec<String>,
    /// 已登录用户不可访问
    pub auth_only: Vec<String>,
    /// 仅管理员
    pub admin: Vec<String>,
    pub login_path: String,
    pub landing_path: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            protected: vec!["/dashboard".into()],
            auth_only: vec!["/login".into(), "/register".into()],
            admin: vec!["/admin".into()],
            login_path: "/login".into(),
            landing_path: "/dashboard".into(),
        }
    }
}

/// 路径的分类结果，三项独立判断
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteClass {
    pub protected: bool,
    pub auth_only: bool,
    pub admin_restricted: bool,
}

impl RouteTable {
    pub fn classify(&self, path: &str) -> RouteClass {
        RouteClass {
            protected: first_match(&self.protected, path).is_some(),
            auth_only: first_match(&self.auth_only, path).is_some(),
            admin_restricted: first_match(&self.admin, path).is_some(),
        }
    }
}

/// 按声明顺序返回第一个匹配的前缀
pub fn first_match<'a>(prefixes: &'a [String], path: &str) -> Option<&'a str> {
    prefixes
        .iter()
        .map(String::as_str)
        .find(|prefix| path.starts_with(prefix))
}

/// 决定请求是否进入守卫
#[derive(Debug, Clone)]
pub struct GateMatcher {
    excluded: Regex,
}

impl GateMatcher {
    pub fn new(exclusion: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            excluded: Regex::new(exclusion)?,
        })
    }

    pub fn applies_to(&self, path: &str) -> bool {
        !self.excluded.is_match(path)
    }
}

impl Default for GateMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSION).expect("valid regex")
    }
}
