//! 客户端错误类型
//!
//! 所有网络请求最终都归一为 [`ApiError`]，UI 只需关心 `message` 与 `status`。

use crate::web::TransportError;
use folio_shared::ValidationError;
use serde_json::Value;
use thiserror::Error;

/// 网络层失败（无 HTTP 响应）时使用的状态码
pub const NETWORK_ERROR_STATUS: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 请求未得到任何响应（断网、连接被拒绝、CORS 等）
    Network,
    /// 服务端返回非 2xx
    Http,
    /// 响应内容不符合预期 Schema
    Validation,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    /// HTTP 状态码；网络层失败时为 [`NETWORK_ERROR_STATUS`]
    pub status: u16,
    pub message: String,
    /// 原始错误响应体（若可解析为 JSON）
    pub payload: Option<Value>,
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            status: NETWORK_ERROR_STATUS,
            message: message.into(),
            payload: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            kind: ErrorKind::Http,
            status,
            message: message.into(),
            payload,
        }
    }

    /// 2xx 响应未通过校验
    pub fn validation(status: u16, error: &ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status,
            message: format!("Invalid response: {}", error),
            payload: None,
        }
    }

    /// 2xx 响应体不是 JSON
    pub fn malformed(status: u16, reason: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            status,
            message: format!("Invalid response: {}", reason.into()),
            payload: None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    /// 凭据失效或权限不足
    pub fn is_auth_rejected(&self) -> bool {
        self.kind == ErrorKind::Http && matches!(self.status, 401 | 403)
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::network(e.to_string())
    }
}
