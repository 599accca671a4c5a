//! 读取型数据请求
//!
//! `Query<R>` 管理单个 endpoint 的 `data / error / loading` 三态：
//! - 每次状态提交都会通知订阅者（界面层据此更新信号）
//! - `unmount` 之后不再提交任何状态，也不再通知
//! - 并发的多次请求中只有最后发起的那次可以提交结果
//!
//! 网络层失败（status 0）时按 `OfflinePolicy` 决定是否以缓存或兜底数据代替错误。

use crate::api::{ApiClient, decode};
use crate::cache::ResourceCache;
use crate::error::ApiError;
use crate::task::TaskScope;
use folio_shared::{Resource, Timestamp};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =========================================================
// 配置
// =========================================================

/// 网络层失败时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfflinePolicy {
    /// 依次尝试缓存、兜底数据，成功则不暴露错误
    #[default]
    UseFallback,
    /// 始终暴露错误
    ReportError,
}

pub struct QueryOptions<R> {
    pub enabled: bool,
    pub initial_data: Option<R>,
    pub fallback_data: Option<R>,
    pub offline_policy: OfflinePolicy,
    pub cache: Option<ResourceCache>,
    pub on_success: Option<Rc<dyn Fn(&R)>>,
    pub on_error: Option<Rc<dyn Fn(&ApiError)>>,
}

impl<R> Default for QueryOptions<R> {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_data: None,
            fallback_data: None,
            offline_policy: OfflinePolicy::UseFallback,
            cache: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<R> QueryOptions<R> {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn initial(mut self, data: R) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn fallback(mut self, data: R) -> Self {
        self.fallback_data = Some(data);
        self
    }

    pub fn offline_policy(mut self, policy: OfflinePolicy) -> Self {
        self.offline_policy = policy;
        self
    }

    pub fn cache(mut self, cache: ResourceCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn on_success(mut self, f: impl Fn(&R) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ApiError) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }
}

// =========================================================
// 状态
// =========================================================

/// 当前数据的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Freshness {
    /// 调用方提供的初始数据，尚未请求
    #[default]
    Initial,
    /// 本次请求的响应
    Live,
    /// 网络不可用时取自缓存
    Cached { stored_at: Timestamp, stale: bool },
    /// 网络不可用时使用的兜底数据
    Fallback,
}

impl Freshness {
    /// 数据不是来自本次成功请求
    pub fn is_degraded(&self) -> bool {
        matches!(self, Freshness::Cached { .. } | Freshness::Fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<R> {
    pub data: Option<R>,
    pub error: Option<ApiError>,
    pub loading: bool,
    pub freshness: Freshness,
}

impl<R> QueryState<R> {
    pub fn status(&self) -> QueryStatus {
        if self.loading {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }
}

impl<R> Default for QueryState<R> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
            freshness: Freshness::Initial,
        }
    }
}

// =========================================================
// Query
// =========================================================

type Observer<R> = Rc<dyn Fn(&QueryState<R>)>;

struct QueryInner<R> {
    api: ApiClient,
    endpoint: RefCell<Option<String>>,
    enabled: Cell<bool>,
    options: QueryOptions<R>,
    state: RefCell<QueryState<R>>,
    scope: TaskScope,
    observer: RefCell<Option<Observer<R>>>,
}

pub struct Query<R> {
    inner: Rc<QueryInner<R>>,
}

impl<R> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Resource + Clone + 'static> Query<R> {
    pub fn new(api: ApiClient, endpoint: Option<String>, options: QueryOptions<R>) -> Self {
        let will_fetch = options.enabled && endpoint.is_some();
        let state = QueryState {
            data: options.initial_data.clone(),
            loading: will_fetch,
            ..QueryState::default()
        };
        Self {
            inner: Rc::new(QueryInner {
                api,
                endpoint: RefCell::new(endpoint),
                enabled: Cell::new(options.enabled),
                options,
                state: RefCell::new(state),
                scope: TaskScope::new(),
                observer: RefCell::new(None),
            }),
        }
    }

    /// 设置状态订阅者（替换之前的订阅者）
    pub fn subscribe(&self, observer: impl Fn(&QueryState<R>) + 'static) {
        *self.inner.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn state(&self) -> QueryState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn endpoint(&self) -> Option<String> {
        self.inner.endpoint.borrow().clone()
    }

    /// 挂载时调用：启用且有 endpoint 时发起请求
    pub async fn run(&self) {
        self.fetch().await;
    }

    /// 重新请求（错误展示中的“重试”）
    pub async fn refetch(&self) {
        self.fetch().await;
    }

    /// 修改 endpoint；调用方随后应再次 `run`
    pub fn set_endpoint(&self, endpoint: Option<String>) {
        *self.inner.endpoint.borrow_mut() = endpoint;
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// 卸载：取消进行中的请求，此后不再提交任何状态
    pub fn unmount(&self) {
        self.inner.scope.close();
        self.inner.observer.borrow_mut().take();
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.scope.is_closed()
    }

    async fn fetch(&self) {
        let inner = &self.inner;
        if inner.scope.is_closed() {
            return;
        }
        let endpoint = match self.endpoint() {
            Some(endpoint) if inner.enabled.get() => endpoint,
            _ => return self.settle_idle(),
        };

        let ticket = inner.scope.issue();
        self.commit(|state| {
            state.loading = true;
            state.error = None;
        });

        let Some(result) = ticket.run(inner.api.get_reply(&endpoint, &[])).await else {
            log::debug!("Query {} cancelled", endpoint);
            return;
        };
        if !inner.scope.is_current(&ticket) {
            log::debug!("Discarding superseded response for {}", endpoint);
            return;
        }

        let outcome = result.and_then(|reply| decode::<R>(&reply).map(|data| (reply, data)));
        match outcome {
            Ok((reply, data)) => {
                if let Some(cache) = &inner.options.cache {
                    cache.put(&endpoint, &reply.body);
                }
                if let Some(on_success) = &inner.options.on_success {
                    on_success(&data);
                }
                self.commit(|state| {
                    state.data = Some(data);
                    state.error = None;
                    state.loading = false;
                    state.freshness = Freshness::Live;
                });
            }
            Err(error) => self.settle_failure(&endpoint, error),
        }
    }

    /// 禁用或无 endpoint：作废进行中的请求并回到空闲
    fn settle_idle(&self) {
        self.inner.scope.issue();
        let untouched = {
            let state = self.inner.state.borrow();
            !state.loading && state.freshness == Freshness::Initial && state.error.is_none()
        };
        // 从未请求过的查询保留调用方给的初始数据
        if untouched {
            return;
        }
        self.commit(|state| *state = QueryState::default());
    }

    fn settle_failure(&self, endpoint: &str, error: ApiError) {
        let options = &self.inner.options;

        if error.is_network() && options.offline_policy == OfflinePolicy::UseFallback {
            let cached = options
                .cache
                .as_ref()
                .and_then(|cache| cache.lookup::<R>(endpoint));

            if let Some((data, entry)) = cached {
                log::warn!("{} unreachable, serving cached copy", endpoint);
                self.commit(|state| {
                    state.data = Some(data);
                    state.error = None;
                    state.loading = false;
                    state.freshness = Freshness::Cached {
                        stored_at: entry.stored_at,
                        stale: entry.stale,
                    };
                });
                return;
            }

            if let Some(fallback) = options.fallback_data.clone() {
                log::warn!("{} unreachable, using fallback data", endpoint);
                self.commit(|state| {
                    state.data = Some(fallback);
                    state.error = None;
                    state.loading = false;
                    state.freshness = Freshness::Fallback;
                });
                return;
            }
        }

        if let Some(on_error) = &options.on_error {
            on_error(&error);
        }
        self.commit(|state| {
            state.data = None;
            state.error = Some(error);
            state.loading = false;
        });
    }

    fn commit(&self, update: impl FnOnce(&mut QueryState<R>)) {
        if self.inner.scope.is_closed() {
            return;
        }
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            update(&mut state);
            state.clone()
        };
        let observer = self.inner.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&snapshot);
        }
    }
}
