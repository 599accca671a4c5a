//! Leptos 数据 Hooks
//!
//! 把 `Query` / `Mutation` 的状态镜像到本地信号：
//! - 组件挂载时（Effect 首次运行）发起请求，endpoint 信号变化时重新请求
//! - 组件卸载时（`on_cleanup`）调用 `unmount`，之后不再写入信号
//!
//! 具体资源的 Hook（`use_projects` 等）集中在文件后半部分。

use crate::api::{ApiClient, UPLOAD_FIELD};
use crate::cache::ResourceCache;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::mutation::{Mutation, MutationConfig, MutationMethod, MutationState};
use crate::query::{Freshness, OfflinePolicy, Query, QueryOptions, QueryState};
use crate::session::SessionHandle;
use crate::upload::Upload;
use crate::web::FilePart;
use folio_shared::{
    Acknowledgement, AuthResponse, ContactMessage, CvData, LikeTarget, LikeToggle, LoginRequest,
    NewContactMessage, Notification, Paginated, Project, RegisterRequest, Resource, ResourceId,
    SiteSettings, Skill, SubscribeRequest, UploadResponse, User, paths,
};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use serde::Serialize;
use serde_json::Value;

// =========================================================
// 服务上下文
// =========================================================

/// 应用级服务，在 `App` 中创建一次并通过 Context 注入
#[derive(Clone)]
pub struct Services {
    pub config: AppConfig,
    pub api: ApiClient,
    pub cache: ResourceCache,
}

impl Services {
    pub fn session(&self) -> &SessionHandle {
        self.api.session()
    }
}

pub fn provide_services(services: Services) {
    provide_context(StoredValue::new_local(services));
}

/// 从 Context 获取服务
pub fn use_services() -> Services {
    use_context::<StoredValue<Services, LocalStorage>>()
        .expect("Services should be provided")
        .get_value()
}

// =========================================================
// 通用 Hook: use_query
// =========================================================

/// 读取请求在组件中的句柄
pub struct QueryHandle<R: 'static> {
    state: RwSignal<QueryState<R>, LocalStorage>,
    query: StoredValue<Query<R>, LocalStorage>,
}

impl<R: 'static> Clone for QueryHandle<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: 'static> Copy for QueryHandle<R> {}

impl<R: Resource + Clone + 'static> QueryHandle<R> {
    pub fn state(&self) -> QueryState<R> {
        self.state.get()
    }

    pub fn data(&self) -> Option<R> {
        self.state.with(|s| s.data.clone())
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.with(|s| s.error.clone())
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn freshness(&self) -> Freshness {
        self.state.with(|s| s.freshness)
    }

    /// 重新请求（错误提示中的“重试”按钮）
    pub fn refetch(&self) {
        if let Some(query) = self.query.try_get_value() {
            spawn_local(async move { query.refetch().await });
        }
    }
}

/// 挂载一个读取请求
///
/// `endpoint` 会被追踪：返回值变化时更新 endpoint 并重新请求，返回 `None` 时不请求。
pub fn use_query<R: Resource + Clone + 'static>(
    endpoint: impl Fn() -> Option<String> + 'static,
    options: QueryOptions<R>,
) -> QueryHandle<R> {
    let services = use_services();
    let initial = untrack(&endpoint);
    let query = Query::new(services.api, initial, options);

    let state = RwSignal::new_local(query.state());
    query.subscribe(move |s| {
        state.try_set(s.clone());
    });
    let stored = StoredValue::new_local(query);

    Effect::new(move |prev: Option<Option<String>>| {
        let next = endpoint();
        if prev.as_ref() != Some(&next) {
            if let Some(query) = stored.try_get_value() {
                query.set_endpoint(next.clone());
                spawn_local(async move { query.run().await });
            }
        }
        next
    });

    on_cleanup(move || {
        stored.try_with_value(Query::unmount);
    });

    QueryHandle {
        state,
        query: stored,
    }
}

// =========================================================
// 通用 Hook: use_mutation
// =========================================================

/// 写请求在组件中的句柄
pub struct MutationHandle<P: 'static, R: 'static> {
    state: RwSignal<MutationState<R>, LocalStorage>,
    mutation: StoredValue<Mutation<P, R>, LocalStorage>,
}

impl<P: 'static, R: 'static> Clone for MutationHandle<P, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: 'static, R: 'static> Copy for MutationHandle<P, R> {}

impl<P: Serialize + 'static, R: Resource + Clone + 'static> MutationHandle<P, R> {
    pub fn state(&self) -> MutationState<R> {
        self.state.get()
    }

    pub fn data(&self) -> Option<R> {
        self.state.with(|s| s.data.clone())
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.with(|s| s.error.clone())
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn mutate(&self, params: P) {
        self.mutate_then(params, |_| {});
    }

    /// 发送写请求，完成后把结果交给 `done`（即使组件已卸载）
    pub fn mutate_then(&self, params: P, done: impl FnOnce(Option<R>) + 'static) {
        if let Some(mutation) = self.mutation.try_get_value() {
            spawn_local(async move {
                let result = mutation.mutate(params).await;
                done(result);
            });
        }
    }

    pub fn reset(&self) {
        self.mutation.try_with_value(Mutation::reset);
    }
}

pub fn use_mutation<P: Serialize + 'static, R: Resource + Clone + 'static>(
    config: MutationConfig<P, R>,
) -> MutationHandle<P, R> {
    let services = use_services();
    let mutation = Mutation::new(services.api, config);

    let state = RwSignal::new_local(mutation.state());
    mutation.subscribe(move |s| {
        state.try_set(s.clone());
    });
    let stored = StoredValue::new_local(mutation);

    on_cleanup(move || {
        stored.try_with_value(Mutation::unmount);
    });

    MutationHandle {
        state,
        mutation: stored,
    }
}

// =========================================================
// 作品与技能
// =========================================================

pub fn use_projects() -> QueryHandle<Paginated<Project>> {
    let cache = use_services().cache;
    use_query(
        || Some(paths::PROJECTS.to_string()),
        QueryOptions::default()
            .cache(cache)
            .fallback(Paginated::empty()),
    )
}

pub fn use_project(slug: impl Fn() -> Option<String> + 'static) -> QueryHandle<Project> {
    let cache = use_services().cache;
    use_query(
        move || slug().map(|slug| paths::project(&slug)),
        QueryOptions::default().cache(cache),
    )
}

pub fn use_skills() -> QueryHandle<Vec<Skill>> {
    let cache = use_services().cache;
    use_query(
        || Some(paths::SKILLS.to_string()),
        QueryOptions::default().cache(cache).fallback(Vec::new()),
    )
}

/// 删除作品，成功后作品列表缓存标记为过时
pub fn use_delete_project() -> MutationHandle<String, Value> {
    let cache = use_services().cache;
    use_mutation(
        MutationConfig::dynamic(|slug: &String| paths::project(slug))
            .method(MutationMethod::Delete)
            .invalidates(cache, &[paths::PROJECTS]),
    )
}

/// 点赞目标
#[derive(Debug, Clone, Serialize)]
pub struct LikeRef {
    #[serde(skip)]
    pub target: LikeTarget,
    #[serde(skip)]
    pub id: ResourceId,
}

pub fn use_toggle_like() -> MutationHandle<LikeRef, LikeToggle> {
    use_mutation(MutationConfig::dynamic(|like: &LikeRef| {
        paths::like(like.target, like.id.as_str())
    }))
}

// =========================================================
// 站点设置与简历
// =========================================================

pub fn use_settings() -> QueryHandle<SiteSettings> {
    let cache = use_services().cache;
    use_query(
        || Some(paths::SETTINGS.to_string()),
        QueryOptions::default()
            .cache(cache)
            .fallback(SiteSettings::default()),
    )
}

pub fn use_cv() -> QueryHandle<CvData> {
    let cache = use_services().cache;
    use_query(
        || Some(paths::CV.to_string()),
        QueryOptions::default().cache(cache).fallback(CvData::default()),
    )
}

// =========================================================
// 认证
// =========================================================

fn auth_mutation<P: Serialize + 'static>(endpoint: &str) -> MutationHandle<P, AuthResponse> {
    let session = use_services().session().clone();
    use_mutation(
        MutationConfig::new(endpoint).on_success(move |auth: &AuthResponse, _: &P| {
            session.login(auth.user.clone(), auth.token.clone())
        }),
    )
}

/// 登录成功后写入会话
pub fn use_login() -> MutationHandle<LoginRequest, AuthResponse> {
    auth_mutation(paths::AUTH_LOGIN)
}

/// 注册成功后直接登录
pub fn use_register() -> MutationHandle<RegisterRequest, AuthResponse> {
    auth_mutation(paths::AUTH_REGISTER)
}

/// 登出动作
#[derive(Clone, Copy)]
pub struct LogoutAction {
    mutation: MutationHandle<(), Value>,
    session: StoredValue<SessionHandle, LocalStorage>,
}

impl LogoutAction {
    /// 通知后端后清除本地会话；后端请求失败同样清除
    pub fn run(&self) {
        if let Some(session) = self.session.try_get_value() {
            self.mutation.mutate_then((), move |_| session.logout());
        }
    }

    pub fn pending(&self) -> bool {
        self.mutation.loading()
    }
}

pub fn use_logout() -> LogoutAction {
    let session = use_services().session().clone();
    LogoutAction {
        mutation: use_mutation(MutationConfig::new(paths::AUTH_LOGOUT)),
        session: StoredValue::new_local(session),
    }
}

// =========================================================
// 互动与联系
// =========================================================

/// 当前用户的通知；未登录时不请求
pub fn use_notifications() -> QueryHandle<Paginated<Notification>> {
    let session = use_services().session().clone();
    use_query(
        || Some(paths::NOTIFICATIONS.to_string()),
        QueryOptions::default()
            .enabled(session.is_authenticated())
            .offline_policy(OfflinePolicy::ReportError),
    )
}

pub fn use_contact() -> MutationHandle<NewContactMessage, ContactMessage> {
    use_mutation(MutationConfig::new(paths::CONTACT))
}

pub fn use_subscribe() -> MutationHandle<SubscribeRequest, Acknowledgement> {
    use_mutation(MutationConfig::new(paths::SUBSCRIBE))
}

/// 管理员用户列表
pub fn use_admin_users() -> QueryHandle<Paginated<User>> {
    use_query(
        || Some(paths::ADMIN_USERS.to_string()),
        QueryOptions::default().offline_policy(OfflinePolicy::ReportError),
    )
}

// =========================================================
// 上传
// =========================================================

/// 图片上传句柄；multipart 请求不经过 JSON 写请求通道
#[derive(Clone, Copy)]
pub struct UploadHandle {
    state: RwSignal<MutationState<UploadResponse>, LocalStorage>,
    upload: StoredValue<Upload, LocalStorage>,
}

impl UploadHandle {
    pub fn state(&self) -> MutationState<UploadResponse> {
        self.state.get()
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn upload(&self, file: FilePart) {
        if let Some(upload) = self.upload.try_get_value() {
            spawn_local(async move {
                upload.upload(file).await;
            });
        }
    }

    /// 上传表单使用的字段名
    pub fn field(&self) -> &'static str {
        UPLOAD_FIELD
    }
}

pub fn use_upload() -> UploadHandle {
    let upload = Upload::new(use_services().api);

    let state = RwSignal::new_local(upload.state());
    upload.subscribe(move |s| {
        state.try_set(s.clone());
    });
    let stored = StoredValue::new_local(upload);

    on_cleanup(move || {
        stored.try_with_value(Upload::unmount);
    });

    UploadHandle {
        state,
        upload: stored,
    }
}
