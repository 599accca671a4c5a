//! 文件上传
//!
//! 与 `Mutation` 共用 `MutationState` 的三态形状，但请求体是 multipart 而不是 JSON 参数。
//! 成功清空错误，失败清空旧结果；多次上传并发时只有最后发起的那次可以提交。

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::mutation::MutationState;
use crate::task::TaskScope;
use crate::web::FilePart;
use folio_shared::{UploadResponse, paths};
use std::cell::RefCell;
use std::rc::Rc;

type Observer = Rc<dyn Fn(&MutationState<UploadResponse>)>;

struct UploadInner {
    api: ApiClient,
    endpoint: String,
    state: RefCell<MutationState<UploadResponse>>,
    scope: TaskScope,
    observer: RefCell<Option<Observer>>,
}

#[derive(Clone)]
pub struct Upload {
    inner: Rc<UploadInner>,
}

impl Upload {
    pub fn new(api: ApiClient) -> Self {
        Self::with_endpoint(api, paths::UPLOAD)
    }

    pub fn with_endpoint(api: ApiClient, endpoint: &str) -> Self {
        Self {
            inner: Rc::new(UploadInner {
                api,
                endpoint: endpoint.to_string(),
                state: RefCell::new(MutationState::default()),
                scope: TaskScope::new(),
                observer: RefCell::new(None),
            }),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&MutationState<UploadResponse>) + 'static) {
        *self.inner.observer.borrow_mut() = Some(Rc::new(observer));
    }

    pub fn state(&self) -> MutationState<UploadResponse> {
        self.inner.state.borrow().clone()
    }

    /// 上传一个文件；失败时返回 `None`，错误记录在状态中
    pub async fn upload(&self, file: FilePart) -> Option<UploadResponse> {
        let inner = &self.inner;
        let ticket = inner.scope.issue();
        self.commit(|state| {
            state.loading = true;
            state.error = None;
        });

        let result: Result<UploadResponse, ApiError> =
            inner.api.upload_as(&inner.endpoint, file).await;
        let live = inner.scope.is_current(&ticket);

        match result {
            Ok(uploaded) => {
                if live {
                    self.commit(|state| {
                        state.data = Some(uploaded.clone());
                        state.error = None;
                        state.loading = false;
                    });
                }
                Some(uploaded)
            }
            Err(error) => {
                log::warn!("Upload failed: {}", error);
                if live {
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

    pub fn unmount(&self) {
        self.inner.scope.close();
        self.inner.observer.borrow_mut().take();
    }

    fn commit(&self, update: impl FnOnce(&mut MutationState<UploadResponse>)) {
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
