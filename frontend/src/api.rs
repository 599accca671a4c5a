//! API 客户端
//!
//! 对 `Transport` 的一层薄封装：拼接 URL、附加认证头、把非 2xx 响应归一为 [`ApiError`]。
//! 所有返回值都是原始 JSON；类型化的读取通过 `*_as` 系列方法经由 Schema 校验。

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::web::{FilePart, HttpRequest, HttpResponse, RequestBody, Transport};
use folio_shared::schema::validate;
use folio_shared::{ApiRequest, HEADER_AUTHORIZATION, HttpMethod, Resource};
use serde::Serialize;
use serde_json::{Value, json};
use std::rc::Rc;

/// 上传接口使用的表单字段名
pub const UPLOAD_FIELD: &str = "image";

/// 2xx 响应：状态码与 JSON 载荷
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Value,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    auth_scheme: String,
    transport: Rc<dyn Transport>,
    session: SessionHandle,
}

impl ApiClient {
    pub fn new(config: &AppConfig, transport: Rc<dyn Transport>, session: SessionHandle) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_scheme: config.auth_scheme.clone(),
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// 拼接完整 URL，查询参数按 form-urlencoded 编码
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    // 认证头：会话持有 token 时才附加
    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.session.token() {
            Some(token) => {
                let value = format!("{} {}", self.auth_scheme, token);
                req.with_header(HEADER_AUTHORIZATION, &value)
            }
            None => req,
        }
    }

    async fn execute(&self, req: HttpRequest) -> Result<ApiReply, ApiError> {
        log::debug!("{} {}", req.method.as_str(), req.url);
        let response = self.transport.send(req).await?;
        interpret(response)
    }

    // =========================================================
    // 原始 JSON 接口
    // =========================================================

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.get_reply(path, query).await.map(|reply| reply.body)
    }

    /// 同 `get`，保留响应状态码
    pub async fn get_reply(&self, path: &str, query: &[(&str, String)]) -> Result<ApiReply, ApiError> {
        let req = HttpRequest::new(HttpMethod::Get, &self.url(path, query));
        self.execute(self.authorize(req)).await
    }

    /// 发送带可选 JSON 请求体的请求；`None` 或 `null` 请求体不发送 body
    pub async fn send_json(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiReply, ApiError> {
        let mut req = HttpRequest::new(method, &self.url(path, &[]));
        if let Some(body) = body.filter(|b| !b.is_null()) {
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(RequestBody::Json(body.to_string()));
        }
        self.execute(self.authorize(req)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        let reply = self.send_json(HttpMethod::Post, path, Some(&body)).await?;
        Ok(reply.body)
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        let reply = self.send_json(HttpMethod::Put, path, Some(&body)).await?;
        Ok(reply.body)
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        let reply = self.send_json(HttpMethod::Patch, path, Some(&body)).await?;
        Ok(reply.body)
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let reply = self.send_json(HttpMethod::Delete, path, None).await?;
        Ok(reply.body)
    }

    /// multipart 上传；不设置 Content-Type，由浏览器生成 boundary
    pub async fn upload(&self, path: &str, file: FilePart) -> Result<Value, ApiError> {
        self.upload_reply(path, file).await.map(|reply| reply.body)
    }

    async fn upload_reply(&self, path: &str, file: FilePart) -> Result<ApiReply, ApiError> {
        let req = HttpRequest::new(HttpMethod::Post, &self.url(path, &[]))
            .with_body(RequestBody::Multipart(file));
        self.execute(self.authorize(req)).await
    }

    // =========================================================
    // 类型化接口
    // =========================================================

    pub async fn get_as<R: Resource>(&self, path: &str, query: &[(&str, String)]) -> Result<R, ApiError> {
        let reply = self.get_reply(path, query).await?;
        decode(&reply)
    }

    pub async fn upload_as<R: Resource>(&self, path: &str, file: FilePart) -> Result<R, ApiError> {
        let reply = self.upload_reply(path, file).await?;
        decode(&reply)
    }

    /// 发送一个在协议目录中声明过的请求
    pub async fn send<Q: ApiRequest>(&self, request: &Q) -> Result<Q::Response, ApiError> {
        let body = encode(request)?;
        let body = Q::METHOD.has_body().then_some(&body);
        let reply = self.send_json(Q::METHOD, &request.path(), body).await?;
        decode(&reply)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::malformed(0, format!("request body: {e}")))
}

/// 校验 2xx 载荷；错误携带该响应的实际状态码
pub fn decode<R: Resource>(reply: &ApiReply) -> Result<R, ApiError> {
    validate::<R>(&reply.body).map_err(|e| {
        log::warn!("Validation failed: {}", e);
        ApiError::validation(reply.status, &e)
    })
}

// =========================================================
// 响应处理
// =========================================================

fn interpret(response: HttpResponse) -> Result<ApiReply, ApiError> {
    let status = response.status;

    if !response.ok() {
        let payload = serde_json::from_str::<Value>(&response.body).ok();
        let message = match &payload {
            Some(body) => extract_message(body).unwrap_or_else(|| format!("HTTP Error: {status}")),
            None if !response.status_text.is_empty() => response.status_text.clone(),
            None => format!("HTTP Error: {status}"),
        };
        log::debug!("HTTP {} -> {}", status, message);
        return Err(ApiError::http(status, message, payload));
    }

    if status == 204 || response.body.trim().is_empty() {
        return Ok(ApiReply {
            status,
            body: json!({}),
        });
    }

    serde_json::from_str(&response.body)
        .map(|body| ApiReply { status, body })
        .map_err(|e| ApiError::malformed(status, e.to_string()))
}

/// 按优先级从错误响应体中提取可读信息
fn extract_message(body: &Value) -> Option<String> {
    const CANDIDATES: [&str; 5] = [
        "/message",
        "/detail",
        "/error",
        "/error/message",
        "/non_field_errors/0",
    ];
    CANDIDATES
        .iter()
        .filter_map(|pointer| body.pointer(pointer).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests;
