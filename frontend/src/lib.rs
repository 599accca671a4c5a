//! Folio 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `api` / `session` / `cache`: 与 Leptos 无关的数据层，可在原生测试中运行
//! - `query` / `mutation` / `upload`: 读写请求的状态机
//! - `hooks`: 把状态机桥接为 Leptos 信号
//! - `web::route` / `web::router`: 路由定义与路由服务
//! - `auth`: 会话状态到信号的桥接
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod hooks;
pub mod mutation;
pub mod query;
pub mod session;
pub mod task;
pub mod upload;
mod components {
    pub mod about;
    pub mod contact;
    pub mod dashboard;
    pub mod home;
    pub mod login;
    pub mod project_detail;
    pub mod status;
    pub mod work;
}
#[cfg(test)]
mod testing;

use crate::auth::{AuthContext, init_auth, use_auth};
use crate::cache::ResourceCache;
use crate::components::about::AboutPage;
use crate::components::contact::ContactPage;
use crate::components::dashboard::{AdminSettingsPage, DashboardPage};
use crate::components::home::HomePage;
use crate::components::login::AuthPage;
use crate::components::project_detail::ProjectDetailPage;
use crate::components::work::WorkPage;
use crate::config::AppConfig;
use crate::hooks::{Services, provide_services};
use crate::session::SessionHandle;

use leptos::prelude::*;
use std::rc::Rc;

// 浏览器 API 封装模块
// 传输层与存储都以 trait 抽象，浏览器实现与测试实现并存。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    #[cfg(test)]
    pub use http::MockTransport;
    pub use http::{
        FetchTransport, FilePart, HttpRequest, HttpResponse, RequestBody, Transport,
        TransportError, read_file,
    };
    pub use storage::{DurableStorage, LocalStorage, MemoryStorage, StorageError};
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Work => view! { <WorkPage /> }.into_any(),
        AppRoute::Project { slug } => view! { <ProjectDetailPage slug=slug /> }.into_any(),
        AppRoute::About => view! { <AboutPage /> }.into_any(),
        AppRoute::Contact => view! { <ContactPage /> }.into_any(),
        AppRoute::Auth => view! { <AuthPage /> }.into_any(),
        AppRoute::Admin => view! { <DashboardPage /> }.into_any(),
        AppRoute::AdminSettings => view! { <AdminSettingsPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let is_admin = auth.is_admin_signal();
    let is_authenticated = auth.is_authenticated_signal();
    // 管理页面有自己的导航栏
    let on_public_page = move || !router.current_route().get().requires_admin();

    view! {
        <Show when=on_public_page>
        <nav class="navbar bg-base-100 shadow">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl">"Folio"</Link>
            </div>
            <div class="flex-none gap-1">
                <Link to="/work" class="btn btn-ghost">"Work"</Link>
                <Link to="/about" class="btn btn-ghost">"About"</Link>
                <Link to="/contact" class="btn btn-ghost">"Contact"</Link>
                <Show when=move || is_admin.get()>
                    <Link to="/admin" class="btn btn-ghost">"Admin"</Link>
                </Show>
                <Show when=move || !is_authenticated.get()>
                    <Link to="/auth" class="btn btn-primary btn-sm">"Sign in"</Link>
                </Show>
            </div>
        </nav>
        </Show>
    }
}

/// 组装应用级服务
pub fn build_services(config: AppConfig) -> Services {
    let storage: Rc<dyn web::DurableStorage> = Rc::new(web::LocalStorage);
    let session = SessionHandle::restore(storage.clone());
    let api = api::ApiClient::new(&config, Rc::new(web::FetchTransport), session);
    let cache = ResourceCache::new(storage, config.cache_max_age);
    Services { config, api, cache }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建服务（会话从 LocalStorage 恢复）
    let services = build_services(AppConfig::from_env());
    log::info!("API base: {}", services.config.api_base_url);

    // 2. 创建认证上下文，订阅会话变化
    let auth_ctx = AuthContext::new(services.session());
    provide_context(auth_ctx);

    // 3. 按配置向后端确认恢复出的会话
    init_auth(services.session(), &services.api, services.config.verify_session);
    provide_services(services);

    // 4. 获取会话信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();
    let is_admin = auth_ctx.is_admin_signal();

    view! {
        // 5. 路由器组件：注入会话信号实现守卫
        <Router is_authenticated=is_authenticated is_admin=is_admin>
            <Navbar />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
