//! 写入型数据请求
//!
//! `Mutation<P, R>` 按需发送一次写请求，并把结果记录到 `data / error / loading`。
//! 与 `Query` 不同，写请求一旦发出就不会被中途放弃；卸载后结果仍返回给调用方，
//! 只是不再提交状态、不再触发回调。

use crate::api::{ApiClient, decode};
use crate::cache::ResourceCache;
use crate::error::ApiError;
use crate::task::TaskScope;
use folio_shared::{HttpMethod, Resource};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

// =========================================================
// 配置
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationMethod {
    #[default]
    Post,
    Put,
    Patch,
    Delete,
}

impl From<MutationMethod> for HttpMethod {
    fn from(method: MutationMethod) -> Self {
        match method {
            MutationMethod::Post => HttpMethod::Post,
            MutationMethod::Put => HttpMethod::Put,
            MutationMethod::Patch => HttpMethod::Patch,
            MutationMethod::Delete => HttpMethod::Delete,
        }
    }
}

/// 固定路径，或由参数计算出的路径
pub enum EndpointSpec<P> {
    Static(String),
    Dynamic(Rc<dyn Fn(&P) -> String>),
}

impl<P> EndpointSpec<P> {
    pub fn resolve(&self, params: &P) -> String {
        match self {
            EndpointSpec::Static(path) => path.clone(),
            EndpointSpec::Dynamic(f) => f(params),
        }
    }
}

impl<P> Clone for EndpointSpec<P> {
    fn clone(&self) -> Self {
        match self {
            EndpointSpec::Static(path) => EndpointSpec::Static(path.clone()),
            EndpointSpec::Dynamic(f) => EndpointSpec::Dynamic(f.clone()),
        }
    }
}

impl<P> From<&str> for EndpointSpec<P> {
    fn from(path: &str) -> Self {
        EndpointSpec::Static(path.to_string())
    }
}

impl<P> From<String> for EndpointSpec<P> {
    fn from(path: String) -> Self {
        EndpointSpec::Static(path)
    }
}

pub struct MutationConfig<P, R> {
    pub method: MutationMethod,
    pub endpoint: EndpointSpec<P>,
    pub on_success: Option<Rc<dyn Fn(&R, &P)>>,
    pub on_error: Option<Rc<dyn Fn(&ApiError, &P)>>,
    /// 成功后标记为过时的缓存 endpoint
    pub invalidates: Vec<String>,
    pub cache: Option<ResourceCache>,
}

impl<P, R> MutationConfig<P, R> {
    pub fn new(endpoint: impl Into<EndpointSpec<P>>) -> Self {
        Self {
            method: MutationMethod::Post,
            endpoint: endpoint.into(),
            on_success: None,
            on_error: None,
            invalidates: Vec::new(),
            cache: None,
        }
    }

    pub fn dynamic(endpoint: impl Fn(&P) -> String + 'static) -> Self {
        Self::new(EndpointSpec::Dynamic(Rc::new(endpoint)))
    }

    pub fn method(mut self, method: MutationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn on_success(mut self, f: impl Fn(&R, &P) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ApiError, &P) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }

    pub fn invalidates(mut self, cache: ResourceCache, endpoints: &[&str]) -> Self {
        self.cache = Some(cache);
        self.invalidates = endpoints.iter().map(|e| e.to_string()).collect();
        self
    }
}

// =========================================================
// 状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MutationState<R> {
    pub data: Option<R>,
    pub error: Option<ApiError>,
    pub loading: bool,
}

impl<R> Default for MutationState<R> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

// =========================================================
// Mutation
// =========================================================

type Observer<R> = Rc<dyn Fn(&MutationState<R>)>;

struct MutationInner<P, R> {
    api: ApiClient,
    config: MutationConfig<P, R>,
    state: RefCell<MutationState<R>>,
    scope: TaskScope,
    observer: RefCell<Option<Observer<R>>>,
}

pub struct Mutation<P, R> {
    inner: Rc<MutationInner<P, R>>,
}

impl<P, R> Clone for Mutation<P, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: Serialize + 'static, R: Resource + Clone + 'static> Mutation<P, R> {
    pub fn new(api: ApiClient, config: MutationConfig<P, R>) -> Self {
        Self {
            inner: Rc::new(MutationInner {
                api,
                config,
                state: RefCell::new(MutationState::default()),
                scope: TaskScope::new(),
                observer: RefCell::new(None),
            }),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&MutationState<R>) + 'static) {
        *self.inner.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn state(&self) -> MutationState<R> {
        self.inner.state.borrow().clone()
    }

    /// 发送写请求；失败时返回 `None`，错误记录在状态中
    pub async fn mutate(&self, params: P) -> Option<R> {
        let inner = &self.inner;
        let config = &inner.config;
        let ticket = inner.scope.issue();
        self.commit(|state| {
            state.loading = true;
            state.error = None;
        });

        let endpoint = config.endpoint.resolve(&params);
        let method = HttpMethod::from(config.method);
        let result = match serde_json::to_value(&params) {
            Ok(body) => {
                let body = method.has_body().then_some(&body);
                inner.api.send_json(method, &endpoint, body).await
            }
            Err(e) => Err(ApiError::malformed(0, format!("request body: {e}"))),
        };
        let result = result.and_then(|reply| decode::<R>(&reply));

        let live = inner.scope.is_current(&ticket);
        match result {
            Ok(data) => {
                if let Some(cache) = &config.cache {
                    for endpoint in &config.invalidates {
                        cache.invalidate(endpoint);
                    }
                }
                if live {
                    if let Some(on_success) = &config.on_success {
                        on_success(&data, &params);
                    }
                    self.commit(|state| {
                        state.data = Some(data.clone());
                        state.error = None;
                        state.loading = false;
                    });
                }
                Some(data)
            }
            Err(error) => {
                log::warn!("{} {} failed: {}", method.as_str(), endpoint, error);
                if live {
                    if let Some(on_error) = &config.on_error {
                        on_error(&error, &params);
                    }
                    self.commit(|state| {
                        state.data = None;
                        state.error = Some(error);
                        state.loading = false;
                    });
                }
                None
            }
        }
    }

    pub fn reset(&self) {
        self.commit(|state| *state = MutationState::default());
    }

    pub fn unmount(&self) {
        self.inner.scope.close();
        self.inner.observer.borrow_mut().take();
    }

    fn commit(&self, update: impl FnOnce(&mut MutationState<R>)) {
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

#[cfg(test)]
mod tests;
