//! 运行时配置
//!
//! CSR 应用没有进程环境变量，配置在构建时通过 `option_env!` 注入，
//! 未设置或非法的值回退到默认值。

use folio_shared::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_SCHEME};
use std::str::FromStr;
use std::time::Duration;

// =========================================================
// 常量定义
// =========================================================

const ENV_API_BASE_URL: &str = "FOLIO_API_BASE_URL";
const ENV_AUTH_SCHEME: &str = "FOLIO_AUTH_SCHEME";
const ENV_LOG_LEVEL: &str = "FOLIO_LOG_LEVEL";
const ENV_VERIFY_SESSION: &str = "FOLIO_VERIFY_SESSION";
const ENV_CACHE_MAX_AGE_SECS: &str = "FOLIO_CACHE_MAX_AGE_SECS";

const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;
const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// API 根地址，不含末尾斜杠
    pub api_base_url: String,
    /// `Authorization` 头中的认证方案
    pub auth_scheme: String,
    pub log_level: log::Level,
    /// 启动时是否向后端校验恢复出的会话
    pub verify_session: bool,
    /// 离线缓存条目的最长可用时间
    pub cache_max_age: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
            verify_session: false,
            cache_max_age: Duration::from_secs(DEFAULT_CACHE_MAX_AGE_SECS),
        }
    }
}

impl AppConfig {
    /// 读取构建时注入的配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                ENV_API_BASE_URL => option_env!("FOLIO_API_BASE_URL"),
                ENV_AUTH_SCHEME => option_env!("FOLIO_AUTH_SCHEME"),
                ENV_LOG_LEVEL => option_env!("FOLIO_LOG_LEVEL"),
                ENV_VERIFY_SESSION => option_env!("FOLIO_VERIFY_SESSION"),
                ENV_CACHE_MAX_AGE_SECS => option_env!("FOLIO_CACHE_MAX_AGE_SECS"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = read(ENV_API_BASE_URL)
            .and_then(|raw| match url::Url::parse(&raw) {
                Ok(_) => Some(raw.trim_end_matches('/').to_string()),
                Err(e) => {
                    log::warn!("{ENV_API_BASE_URL}={raw} is not a valid URL ({e}), using default");
                    None
                }
            })
            .unwrap_or(defaults.api_base_url);

        let auth_scheme = read(ENV_AUTH_SCHEME).unwrap_or(defaults.auth_scheme);

        let log_level = read(ENV_LOG_LEVEL)
            .and_then(|raw| parse_or_warn(ENV_LOG_LEVEL, &raw, log::Level::from_str))
            .unwrap_or(defaults.log_level);

        let verify_session = read(ENV_VERIFY_SESSION)
            .and_then(|raw| parse_or_warn(ENV_VERIFY_SESSION, &raw, parse_flag))
            .unwrap_or(defaults.verify_session);

        let cache_max_age = read(ENV_CACHE_MAX_AGE_SECS)
            .and_then(|raw| parse_or_warn(ENV_CACHE_MAX_AGE_SECS, &raw, u64::from_str))
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_max_age);

        Self {
            api_base_url,
            auth_scheme,
            log_level,
            verify_session,
            cache_max_age,
        }
    }
}

fn parse_or_warn<T, E>(key: &str, raw: &str, parse: impl Fn(&str) -> Result<T, E>) -> Option<T> {
    match parse(raw) {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("{key}={raw} could not be parsed, using default");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Result<bool, ()> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.auth_scheme, "Bearer");
        assert!(!config.verify_session);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "https://api.example.com/api/"),
            (ENV_AUTH_SCHEME, "Token"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_VERIFY_SESSION, "yes"),
            (ENV_CACHE_MAX_AGE_SECS, "60"),
        ]));
        assert_eq!(config.api_base_url, "https://api.example.com/api");
        assert_eq!(config.auth_scheme, "Token");
        assert_eq!(config.log_level, log::Level::Debug);
        assert!(config.verify_session);
        assert_eq!(config.cache_max_age, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_BASE_URL, "not a url"),
            (ENV_LOG_LEVEL, "loud"),
            (ENV_VERIFY_SESSION, "maybe"),
            (ENV_CACHE_MAX_AGE_SECS, "-5"),
            (ENV_AUTH_SCHEME, "   "),
        ]));
        assert_eq!(config, AppConfig::default());
    }
}
