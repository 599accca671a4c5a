//! 测试夹具：内存存储 + 模拟传输层组装出的客户端

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::session::SessionHandle;
use crate::web::{MemoryStorage, MockTransport};
use serde_json::{Value, json};
use std::rc::Rc;

pub const BASE: &str = "http://api.test/api";

pub struct Fixture {
    pub transport: Rc<MockTransport>,
    pub storage: Rc<MemoryStorage>,
    pub session: SessionHandle,
    pub api: ApiClient,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_storage(Rc::new(MemoryStorage::new()))
    }

    /// 使用预先填充的存储，会话从中恢复
    pub fn with_storage(storage: Rc<MemoryStorage>) -> Self {
        let transport = Rc::new(MockTransport::new());
        let session = SessionHandle::restore(storage.clone());
        let config = AppConfig {
            api_base_url: BASE.to_string(),
            ..AppConfig::default()
        };
        let api = ApiClient::new(&config, transport.clone(), session.clone());
        Self {
            transport,
            storage,
            session,
            api,
        }
    }

    pub fn url(path: &str) -> String {
        format!("{BASE}{path}")
    }
}

pub fn user_json(role: &str) -> Value {
    json!({
        "id": 1,
        "email": "pilot@example.com",
        "user_type": role,
        "first_name": "Kai",
        "last_name": "Rowe",
        "profile_image": null
    })
}

pub fn project_json(slug: &str) -> Value {
    json!({
        "id": slug.len(),
        "title": slug.to_uppercase(),
        "slug": slug,
        "description": "",
        "category": "Development",
        "thumbnail": format!("https://cdn.example.com/{slug}.jpg"),
        "created_at": "2024-03-01T00:00:00Z"
    })
}

pub fn project_page(slugs: &[&str]) -> Value {
    let results: Vec<Value> = slugs.iter().map(|s| project_json(s)).collect();
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}
