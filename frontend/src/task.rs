//! 任务作用域
//!
//! 每个 query / mutation 实例持有一个 `TaskScope`。卸载时取消作用域；
//! 每次请求领取一张带序号的 `TaskTicket`，只有作用域仍存活且序号最新的票据才允许提交结果。

use futures::future::{Either, select};
use std::cell::Cell;
use std::future::Future;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub struct TaskScope {
    token: CancellationToken,
    issued: Cell<u64>,
}

#[derive(Debug, Clone)]
pub struct TaskTicket {
    seq: u64,
    token: CancellationToken,
}

impl TaskScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新票据，之前发出的票据随即失效
    pub fn issue(&self) -> TaskTicket {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        TaskTicket {
            seq,
            token: self.token.child_token(),
        }
    }

    /// 票据是否仍可提交结果
    pub fn is_current(&self, ticket: &TaskTicket) -> bool {
        !self.token.is_cancelled() && ticket.seq == self.issued.get()
    }

    /// 关闭作用域，取消所有进行中的票据
    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl TaskTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// 等待 future 完成；若期间作用域被关闭则放弃等待并返回 `None`
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let cancelled = std::pin::pin!(self.token.cancelled());
        let fut = std::pin::pin!(fut);
        match select(cancelled, fut).await {
            Either::Left(_) => None,
            Either::Right((output, _)) => Some(output),
        }
    }
}
