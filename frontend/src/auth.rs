//! 认证模块
//!
//! 把 `SessionHandle` 的状态桥接为 Leptos 信号，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态；登录、登出只经由 `SessionHandle` 完成。

use crate::api::ApiClient;
use crate::session::{Session, SessionHandle, Verification};
use folio_shared::User;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 认证上下文
///
/// 会话快照的只读信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话快照（只读）
    pub state: ReadSignal<Session>,
}

impl AuthContext {
    /// 创建认证上下文并订阅会话变化
    pub fn new(session: &SessionHandle) -> Self {
        let (state, set_state) = signal(session.snapshot());
        session.subscribe(move |s| {
            set_state.try_set(s.clone());
        });
        Self { state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(Session::is_authenticated))
    }

    /// 获取管理员身份信号（用于路由服务注入）
    pub fn is_admin_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(Session::is_admin))
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 启动时向后端确认恢复出的会话
///
/// 未开启时直接信任存储中的 token；被拒绝的 token 会触发登出，
/// 路由服务监听到认证状态变化后自动重定向。
pub fn init_auth(session: &SessionHandle, api: &ApiClient, verify: bool) {
    if !verify || !session.is_authenticated() {
        return;
    }
    let session = session.clone();
    let api = api.clone();
    spawn_local(async move {
        match session.verify(&api).await {
            Verification::Rejected => log::info!("Stored session discarded"),
            outcome => log::debug!("Session verification: {:?}", outcome),
        }
    });
}
