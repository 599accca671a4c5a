//! 持久化存储封装模块
//!
//! `DurableStorage` 抽象浏览器 LocalStorage，使会话与缓存逻辑可在原生测试中运行。

use gloo_storage::Storage;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("存储写入失败 ({key}): {reason}")]
pub struct StorageError {
    pub key: String,
    pub reason: String,
}

/// 字符串键值存储
///
/// 读取失败一律视为不存在；写入失败返回错误，由调用方决定是否降级。
pub trait DurableStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// 浏览器 LocalStorage
///
/// 值按原始字符串读写，不经过 gloo 的 JSON 编码，与已有数据保持兼容。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        gloo_storage::LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        gloo_storage::LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| StorageError {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) {
        gloo_storage::LocalStorage::delete(key);
    }
}

/// 内存存储，用于测试及无浏览器环境
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    /// 写入一律失败的键（模拟配额已满）
    rejected: RefCell<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn reject_writes_to(&self, key: &str) {
        self.rejected.borrow_mut().insert(key.to_string());
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.rejected.borrow().contains(key) {
            return Err(StorageError {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
