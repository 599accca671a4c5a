//! 会话管理
//!
//! `SessionHandle` 是当前登录用户与 token 的唯一持有者，并负责与持久化存储同步。
//! 它与 Leptos 无关；界面层通过 `subscribe` 把变化桥接到信号（见 `auth` 模块）。

use crate::api::ApiClient;
use crate::web::{DurableStorage, StorageError};
use folio_shared::schema::validate;
use folio_shared::{ProfileRequest, STORAGE_KEY_TOKEN, STORAGE_KEY_USER, User};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// 会话快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// 后端校验会话的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// 没有需要校验的会话
    Anonymous,
    /// token 有效，用户信息已刷新
    Valid,
    /// token 被拒绝，会话已清除
    Rejected,
    /// 网络失败或响应异常，会话保持不变
    Inconclusive,
}

type Observer = Rc<dyn Fn(&Session)>;

struct SessionInner {
    storage: Rc<dyn DurableStorage>,
    state: RefCell<Session>,
    observers: RefCell<Vec<(usize, Observer)>>,
    next_observer: Cell<usize>,
}

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(usize);

#[derive(Clone)]
pub struct SessionHandle {
    inner: Rc<SessionInner>,
}

impl SessionHandle {
    /// 创建空会话，不读取存储
    pub fn new(storage: Rc<dyn DurableStorage>) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                storage,
                state: RefCell::new(Session::default()),
                observers: RefCell::new(Vec::new()),
                next_observer: Cell::new(0),
            }),
        }
    }

    /// 创建会话并从存储中恢复
    pub fn restore(storage: Rc<dyn DurableStorage>) -> Self {
        let handle = Self::new(storage);
        handle.reload();
        handle
    }

    /// 从存储重新加载会话
    ///
    /// token 与用户记录必须同时存在，且用户记录能通过校验；否则清除残留并保持未登录。
    pub fn reload(&self) {
        let storage = &self.inner.storage;
        let token = storage.get(STORAGE_KEY_TOKEN).filter(|t| !t.is_empty());
        let user_raw = storage.get(STORAGE_KEY_USER);

        let restored = match (token, user_raw) {
            (Some(token), Some(raw)) => match serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|value| validate::<User>(&value).ok())
            {
                Some(user) => Some(Session {
                    user: Some(user),
                    token: Some(token),
                }),
                None => {
                    log::warn!("Stored user record is invalid, discarding session");
                    None
                }
            },
            (None, None) => None,
            _ => {
                log::warn!("Incomplete stored session, discarding");
                None
            }
        };

        match restored {
            Some(session) => {
                log::info!("Session restored");
                self.commit(session);
            }
            None => {
                storage.remove(STORAGE_KEY_TOKEN);
                storage.remove(STORAGE_KEY_USER);
                self.commit(Session::default());
            }
        }
    }

    /// 登录：写入内存与存储
    ///
    /// 两个键要么都写入，要么都不留；存储写入失败时会话仅保留在内存中（本次页面生命周期内有效）。
    pub fn login(&self, user: User, token: String) {
        if let Err(e) = self.persist(&user, &token) {
            log::warn!("Session not persisted: {}", e);
            let storage = &self.inner.storage;
            storage.remove(STORAGE_KEY_TOKEN);
            storage.remove(STORAGE_KEY_USER);
        }

        log::info!("Logged in as {}", user.email);
        self.commit(Session {
            user: Some(user),
            token: Some(token),
        });
    }

    fn persist(&self, user: &User, token: &str) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user).map_err(|e| StorageError {
            key: STORAGE_KEY_USER.to_string(),
            reason: e.to_string(),
        })?;
        let storage = &self.inner.storage;
        storage.set(STORAGE_KEY_TOKEN, token)?;
        storage.set(STORAGE_KEY_USER, &raw)
    }

    /// 登出：清除内存与存储
    pub fn logout(&self) {
        let storage = &self.inner.storage;
        storage.remove(STORAGE_KEY_TOKEN);
        storage.remove(STORAGE_KEY_USER);
        log::info!("Logged out");
        self.commit(Session::default());
    }

    /// 替换当前用户信息（token 不变）
    pub fn update_user(&self, user: User) {
        let Some(token) = self.token() else {
            return;
        };
        self.login(user, token);
    }

    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.state.borrow().is_admin()
    }

    pub fn subscribe(&self, observer: impl Fn(&Session) + 'static) -> SubscriptionId {
        let id = self.inner.next_observer.get();
        self.inner.next_observer.set(id + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(observer_id, _)| *observer_id != id.0);
    }

    /// 向后端校验当前 token
    pub async fn verify(&self, api: &ApiClient) -> Verification {
        if !self.is_authenticated() {
            return Verification::Anonymous;
        }

        match api.send(&ProfileRequest).await {
            Ok(user) => {
                self.update_user(user);
                Verification::Valid
            }
            Err(e) if e.is_auth_rejected() => {
                log::info!("Stored token rejected ({}), logging out", e.status);
                self.logout();
                Verification::Rejected
            }
            Err(e) => {
                log::warn!("Session verification skipped: {}", e);
                Verification::Inconclusive
            }
        }
    }

    fn commit(&self, session: Session) {
        *self.inner.state.borrow_mut() = session.clone();
        // 先复制观察者列表，允许回调中再次订阅或读取会话
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(&session);
        }
    }
}

#[cfg(test)]
mod tests;
