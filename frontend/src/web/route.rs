//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性，以及导航守卫的判定规则。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    /// 作品列表
    Work,
    /// 作品详情
    Project { slug: String },
    /// 简历
    About,
    Contact,
    /// 登录 / 注册
    Auth,
    /// 管理面板 (需要管理员)
    Admin,
    /// 站点设置 (需要管理员)
    AdminSettings,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/work" => Self::Work,
            "/about" => Self::About,
            "/contact" => Self::Contact,
            "/auth" | "/login" | "/register" => Self::Auth,
            "/admin" => Self::Admin,
            "/admin/settings" => Self::AdminSettings,
            _ => match trimmed.strip_prefix("/project/") {
                Some(slug) if !slug.is_empty() && !slug.contains('/') => Self::Project {
                    slug: slug.to_string(),
                },
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Work => "/work".to_string(),
            Self::Project { slug } => format!("/project/{slug}"),
            Self::About => "/about".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::Auth => "/auth".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::AdminSettings => "/admin/settings".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.requires_admin()
    }

    /// 管理页面只对管理员开放
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::AdminSettings)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Auth
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }

    /// 权限不足（已登录但非管理员）时的重定向目标
    pub fn forbidden_redirect() -> Self {
        Self::Home
    }

    /// 守卫判定：返回需要重定向到的路由，`None` 表示放行
    pub fn guard(&self, is_authenticated: bool, is_admin: bool) -> Option<Self> {
        if self.requires_auth() && !is_authenticated {
            return Some(Self::auth_failure_redirect());
        }
        if self.requires_admin() && !is_admin {
            return Some(Self::forbidden_redirect());
        }
        if self.should_redirect_when_authenticated() && is_authenticated {
            return Some(Self::auth_success_redirect());
        }
        None
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", AppRoute::Home)]
    #[case("", AppRoute::Home)]
    #[case("/work", AppRoute::Work)]
    #[case("/work/", AppRoute::Work)]
    #[case("/about", AppRoute::About)]
    #[case("/contact", AppRoute::Contact)]
    #[case("/auth", AppRoute::Auth)]
    #[case("/login", AppRoute::Auth)]
    #[case("/admin", AppRoute::Admin)]
    #[case("/admin/settings", AppRoute::AdminSettings)]
    #[case("/project/drone-reel", AppRoute::Project { slug: "drone-reel".to_string() })]
    #[case("/project/", AppRoute::NotFound)]
    #[case("/project/a/b", AppRoute::NotFound)]
    #[case("/nope", AppRoute::NotFound)]
    fn test_from_path(#[case] path: &str, #[case] expected: AppRoute) {
        assert_eq!(AppRoute::from_path(path), expected);
    }

    #[test]
    fn test_path_round_trip() {
        let routes = [
            AppRoute::Home,
            AppRoute::Work,
            AppRoute::Project {
                slug: "alpha".to_string(),
            },
            AppRoute::About,
            AppRoute::Contact,
            AppRoute::Auth,
            AppRoute::Admin,
            AppRoute::AdminSettings,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_guard_anonymous() {
        assert_eq!(AppRoute::Admin.guard(false, false), Some(AppRoute::Auth));
        assert_eq!(AppRoute::AdminSettings.guard(false, false), Some(AppRoute::Auth));
        assert_eq!(AppRoute::Work.guard(false, false), None);
        assert_eq!(AppRoute::Auth.guard(false, false), None);
    }

    #[test]
    fn test_guard_visitor() {
        assert_eq!(AppRoute::Admin.guard(true, false), Some(AppRoute::Home));
        assert_eq!(AppRoute::Auth.guard(true, false), Some(AppRoute::Home));
        assert_eq!(AppRoute::Contact.guard(true, false), None);
    }

    #[test]
    fn test_guard_admin() {
        assert_eq!(AppRoute::Admin.guard(true, true), None);
        assert_eq!(AppRoute::AdminSettings.guard(true, true), None);
        assert_eq!(AppRoute::Auth.guard(true, true), Some(AppRoute::Home));
    }
}
