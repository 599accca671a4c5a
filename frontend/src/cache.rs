//! 资源缓存
//!
//! 每个 endpoint 对应一个缓存条目，保存最近一次校验通过的原始载荷。
//! 写操作成功后通过 `invalidate` 标记条目过时，读取时仍会重新校验。

use crate::web::DurableStorage;
use folio_shared::schema::validate;
use folio_shared::{PREFIX_CACHE, Resource, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stored_at: Timestamp,
    /// 条目之后发生过写操作，内容可能已过时
    #[serde(default)]
    pub stale: bool,
    pub payload: Value,
}

impl CacheEntry {
    pub fn is_expired(&self, max_age: Duration, now: Timestamp) -> bool {
        now.is_older_than(self.stored_at, max_age)
    }
}

type Clock = Rc<dyn Fn() -> Timestamp>;

#[derive(Clone)]
pub struct ResourceCache {
    storage: Rc<dyn DurableStorage>,
    max_age: Duration,
    clock: Clock,
}

impl ResourceCache {
    pub fn new(storage: Rc<dyn DurableStorage>, max_age: Duration) -> Self {
        Self {
            storage,
            max_age,
            clock: Rc::new(Timestamp::now),
        }
    }

    /// 替换时钟（测试用）
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn key(endpoint: &str) -> String {
        format!("{PREFIX_CACHE}{endpoint}")
    }

    /// 读取条目；无法解析的条目会被删除
    pub fn get(&self, endpoint: &str) -> Option<CacheEntry> {
        let key = Self::key(endpoint);
        let raw = self.storage.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Dropping unreadable cache entry {}: {}", key, e);
                self.storage.remove(&key);
                None
            }
        }
    }

    pub fn put(&self, endpoint: &str, payload: &Value) {
        let entry = CacheEntry {
            stored_at: (self.clock)(),
            stale: false,
            payload: payload.clone(),
        };
        self.write(endpoint, &entry);
    }

    /// 标记为过时（保留内容，供离线时展示）
    pub fn invalidate(&self, endpoint: &str) {
        if let Some(mut entry) = self.get(endpoint) {
            entry.stale = true;
            self.write(endpoint, &entry);
        }
    }

    pub fn remove(&self, endpoint: &str) {
        self.storage.remove(&Self::key(endpoint));
    }

    /// 取出仍在有效期内且能通过校验的条目
    pub fn lookup<R: Resource>(&self, endpoint: &str) -> Option<(R, CacheEntry)> {
        let entry = self.get(endpoint)?;
        if entry.is_expired(self.max_age, (self.clock)()) {
            log::debug!("Cache entry for {} expired", endpoint);
            self.remove(endpoint);
            return None;
        }
        match validate::<R>(&entry.payload) {
            Ok(data) => Some((data, entry)),
            Err(e) => {
                log::warn!("Cached payload for {} no longer valid: {}", endpoint, e);
                self.remove(endpoint);
                None
            }
        }
    }

    fn write(&self, endpoint: &str, entry: &CacheEntry) {
        let raw = match serde_json::to_string(entry) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to encode cache entry for {}: {}", endpoint, e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&Self::key(endpoint), &raw) {
            log::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;
    use folio_shared::Skill;
    use serde_json::json;
    use std::cell::Cell;

    fn cache_at(storage: Rc<MemoryStorage>, now: Rc<Cell<i64>>) -> ResourceCache {
        ResourceCache::new(storage, Duration::from_secs(60))
            .with_clock(move || Timestamp::new(now.get()))
    }

    fn skills() -> Value {
        json!([{"id": 1, "name": "Rust", "level": 90, "category": "Backend"}])
    }

    #[test]
    fn test_put_and_lookup() {
        let storage = Rc::new(MemoryStorage::new());
        let cache = cache_at(storage.clone(), Rc::new(Cell::new(1_000)));

        cache.put("/projects/skills/", &skills());

        assert!(storage.contains("folio.cache:/projects/skills/"));
        let (data, entry) = cache.lookup::<Vec<Skill>>("/projects/skills/").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(entry.stored_at, Timestamp::new(1_000));
        assert!(!entry.stale);
    }

    #[test]
    fn test_invalidate_marks_stale() {
        let cache = cache_at(Rc::new(MemoryStorage::new()), Rc::new(Cell::new(0)));
        cache.put("/projects/skills/", &skills());
        cache.invalidate("/projects/skills/");
        cache.invalidate("/never/cached/");

        assert!(cache.get("/projects/skills/").unwrap().stale);
        assert!(cache.get("/never/cached/").is_none());
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let now = Rc::new(Cell::new(0));
        let storage = Rc::new(MemoryStorage::new());
        let cache = cache_at(storage.clone(), now.clone());
        cache.put("/projects/skills/", &skills());

        now.set(61_000);

        assert!(cache.lookup::<Vec<Skill>>("/projects/skills/").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_invalid_payload_is_dropped() {
        let storage = Rc::new(MemoryStorage::new());
        let cache = cache_at(storage.clone(), Rc::new(Cell::new(0)));
        cache.put("/projects/skills/", &json!([{"id": 1}]));

        assert!(cache.lookup::<Vec<Skill>>("/projects/skills/").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_corrupt_entry_is_dropped() {
        let storage = Rc::new(MemoryStorage::new());
        storage.set("folio.cache:/cv/", "{oops").unwrap();
        let cache = cache_at(storage.clone(), Rc::new(Cell::new(0)));

        assert!(cache.get("/cv/").is_none());
        assert!(storage.is_empty());
    }
}
