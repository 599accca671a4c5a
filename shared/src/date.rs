//! 时间类型模块
//!
//! `Timestamp`: 可序列化的毫秒时间戳，用于缓存条目的存储与过期判断

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// 毫秒时间戳，用于序列化传输和存储
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 当前时间
    ///
    /// chrono 在 wasm32 上通过 `js_sys::Date` 取时，原生平台使用系统时钟
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 距 `earlier` 是否已超过 `max_age`
    pub fn is_older_than(&self, earlier: Timestamp, max_age: Duration) -> bool {
        *self - earlier > max_age
    }

    /// RFC 3339 格式，无法表示时返回 None
    pub fn to_rfc3339(&self) -> Option<String> {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.0).map(|dt| dt.to_rfc3339())
    }

    /// 从 ISO 8601 / RFC 3339 字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    /// 超出 `i64` 范围时饱和
    fn add(self, rhs: Duration) -> Self::Output {
        let ms = i64::try_from(rhs.as_millis()).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(ms))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值，负差值截断为零，溢出时饱和
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = self.0.saturating_sub(rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_saturates_at_zero() {
        let a = Timestamp::new(1_000);
        let b = Timestamp::new(5_000);
        assert_eq!(b - a, Duration::from_secs(4));
        assert_eq!(a - b, Duration::ZERO);
    }

    #[test]
    fn test_is_older_than() {
        let stored = Timestamp::new(0);
        let now = stored + Duration::from_secs(61);
        assert!(now.is_older_than(stored, Duration::from_secs(60)));
        assert!(!now.is_older_than(stored, Duration::from_secs(61)));
    }

    #[test]
    fn test_extreme_timestamps_saturate() {
        let max = Timestamp::new(i64::MAX);
        let min = Timestamp::new(i64::MIN);
        assert_eq!(max - min, Duration::from_millis(i64::MAX as u64));
        assert_eq!(min - max, Duration::ZERO);
        assert_eq!(max + Duration::from_secs(1), max);
        assert_eq!(Timestamp::new(0) + Duration::MAX, max);
        // 被篡改的缓存时间戳不应 panic，只会视为过期
        assert!(Timestamp::now().is_older_than(min, Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = Timestamp::parse("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(ts.as_millis(), 1_000);
        assert!(Timestamp::parse("yesterday").is_none());
        assert_eq!(ts.to_rfc3339().as_deref(), Some("1970-01-01T00:00:01+00:00"));
    }
}
