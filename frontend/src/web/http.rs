//! HTTP 传输层
//!
//! `Transport` 是网络边界的唯一抽象：浏览器中由 `FetchTransport`（基于 gloo-net）实现，
//! 测试中由 `MockTransport` 实现。上层的 `ApiClient` 只依赖这个 trait。

use folio_shared::HttpMethod;
use thiserror::Error;

#[cfg(test)]
use futures::channel::oneshot;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 请求 / 响应模型
// =========================================================

/// 上传的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// 表单字段名
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(FilePart),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// 按名称查找请求头（大小写不敏感）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层错误：请求未能得到任何 HTTP 响应
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("请求构建失败: {0}")]
    Build(String),
    #[error("网络错误: {0}")]
    Network(String),
}

#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn builder(method: HttpMethod, url: &str) -> gloo_net::http::RequestBuilder {
        use gloo_net::http::Request;
        match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Patch => Request::patch(url),
            HttpMethod::Delete => Request::delete(url),
        }
    }

    fn form_data(part: &FilePart) -> Result<web_sys::FormData, TransportError> {
        let js_err = |e: wasm_bindgen::JsValue| TransportError::Build(format!("{:?}", e));

        let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&bytes);

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(&part.content_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_err)?;

        let form = web_sys::FormData::new().map_err(js_err)?;
        form.append_with_blob_and_filename(&part.field, &blob, &part.file_name)
            .map_err(js_err)?;
        Ok(form)
    }
}

/// 读取文件选择框中的文件，作为 `field` 字段上传
pub async fn read_file(file: &web_sys::File, field: &str) -> Result<FilePart, TransportError> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| TransportError::Build(format!("{:?}", e)))?;
    Ok(FilePart {
        field: field.to_string(),
        file_name: file.name(),
        content_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = Self::builder(req.method, &req.url);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        // multipart 请求不设置 Content-Type，由浏览器生成 boundary
        let request = match req.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(body) => builder.body(body),
            RequestBody::Multipart(part) => builder.body(Self::form_data(&part)?),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let status_text = response.status_text();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
enum Scripted {
    Reply(u16, String, String),
    Fail(String),
}

/// 记录请求、按 "METHOD url" 返回预设响应的传输层
#[cfg(test)]
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<HashMap<String, Scripted>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, "", &body.to_string());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, status_text: &str, body: &str) {
        self.responses.borrow_mut().insert(
            Self::key(method, url),
            Scripted::Reply(status, status_text.to_string(), body.to_string()),
        );
    }

    /// 模拟连接被拒绝等网络层失败
    pub fn mock_network_failure(&self, method: HttpMethod, url: &str) {
        self.responses.borrow_mut().insert(
            Self::key(method, url),
            Scripted::Fail("connection refused".to_string()),
        );
    }

    /// 让下一次匹配的请求挂起，直到返回的 Sender 被触发（或被丢弃）
    pub fn gate(&self, method: HttpMethod, url: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(Self::key(method, url), rx);
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        let gate = self.gates.borrow_mut().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.responses.borrow().get(&key) {
            Some(Scripted::Reply(status, status_text, body)) => Ok(HttpResponse {
                status: *status,
                status_text: status_text.clone(),
                body: body.clone(),
            }),
            Some(Scripted::Fail(msg)) => Err(TransportError::Network(msg.clone())),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: "Not Found".to_string(),
            }),
        }
    }
}
