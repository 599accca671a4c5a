//! 声明式 Schema 校验层
//!
//! 每种资源对应一个 [`Schema`]，由基础组合子（字符串、数值、枚举、ID、数组、对象、可空）
//! 组合而成。后端返回的原始 JSON 必须先经过这里，才能进入 UI 状态：
//! - 校验通过：返回规范化后的载荷（补齐默认值、ID 统一为字符串、剔除未声明字段）
//! - 校验失败：返回携带路径的 [`ValidationError`]，绝不返回“半类型化”的数据

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

// =========================================================
// 组合子定义
// =========================================================

/// 字符串格式约束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Url,
    Email,
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFormat::Url => write!(f, "url"),
            StringFormat::Email => write!(f, "email"),
        }
    }
}

/// 字符串约束：最小长度（按字符计）与可选格式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringRule {
    pub min_len: usize,
    pub format: Option<StringFormat>,
}

/// 字段出现规则
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// 必须出现
    Required,
    /// 可以缺省，缺省时输出中也不出现
    Optional,
    /// 可以缺省，缺省时使用给定默认值
    Default(Value),
}

/// 对象字段
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub presence: Presence,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            presence: Presence::Required,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            presence: Presence::Optional,
        }
    }

    pub fn with_default(name: &'static str, schema: Schema, default: Value) -> Self {
        Self {
            name,
            schema,
            presence: Presence::Default(default),
        }
    }
}

/// 载荷形状描述
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// 不做任何约束（“无 schema”）
    Any,
    Bool,
    String(StringRule),
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// 枚举字面量，未知值一律视为失败
    Enum(&'static [&'static str]),
    /// 标识符：接受字符串或数字，统一规范化为字符串
    Id,
    Array(Box<Schema>),
    Object(Vec<Field>),
    Nullable(Box<Schema>),
    /// 先尝试左侧，失败再尝试右侧
    Either(Box<Schema>, Box<Schema>),
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(StringRule::default())
    }

    pub fn non_empty() -> Self {
        Schema::String(StringRule {
            min_len: 1,
            format: None,
        })
    }

    pub fn url() -> Self {
        Schema::String(StringRule {
            min_len: 0,
            format: Some(StringFormat::Url),
        })
    }

    pub fn email() -> Self {
        Schema::String(StringRule {
            min_len: 0,
            format: Some(StringFormat::Email),
        })
    }

    pub fn integer() -> Self {
        Schema::Integer {
            min: None,
            max: None,
        }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        Schema::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn non_negative_int() -> Self {
        Schema::Integer {
            min: Some(0),
            max: None,
        }
    }

    pub fn number() -> Self {
        Schema::Number {
            min: None,
            max: None,
        }
    }

    /// 百分比：闭区间 [0, 100]
    pub fn percentage() -> Self {
        Schema::Number {
            min: Some(0.0),
            max: Some(100.0),
        }
    }

    pub fn enumeration(values: &'static [&'static str]) -> Self {
        Schema::Enum(values)
    }

    pub fn array(item: Schema) -> Self {
        Schema::Array(Box::new(item))
    }

    pub fn object(fields: Vec<Field>) -> Self {
        Schema::Object(fields)
    }

    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable(Box::new(inner))
    }

    pub fn or(self, other: Schema) -> Self {
        Schema::Either(Box::new(self), Box::new(other))
    }

    fn accepts_null(&self) -> bool {
        match self {
            Schema::Any | Schema::Nullable(_) => true,
            Schema::Either(a, b) => a.accepts_null() || b.accepts_null(),
            _ => false,
        }
    }

    /// 校验并规范化载荷
    pub fn check(&self, value: &Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        let normalized = self.walk(value, "", &mut issues);
        if issues.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError { issues })
        }
    }

    fn walk(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) -> Value {
        match self {
            Schema::Any => value.clone(),
            Schema::Bool => {
                if value.is_boolean() {
                    value.clone()
                } else {
                    issues.push(Issue::wrong_type(path, "boolean", value));
                    Value::Null
                }
            }
            Schema::String(rule) => match value.as_str() {
                Some(s) => {
                    rule.check(s, path, issues);
                    value.clone()
                }
                None => {
                    issues.push(Issue::wrong_type(path, "string", value));
                    Value::Null
                }
            },
            Schema::Integer { min, max } => match integral(value) {
                Some(n) => {
                    let below = min.is_some_and(|m| n < m);
                    let above = max.is_some_and(|m| n > m);
                    if below || above {
                        issues.push(Issue::new(
                            path,
                            IssueKind::OutOfRange {
                                value: n as f64,
                                min: min.map(|m| m as f64),
                                max: max.map(|m| m as f64),
                            },
                        ));
                    }
                    Value::from(n)
                }
                None => {
                    issues.push(Issue::wrong_type(path, "integer", value));
                    Value::Null
                }
            },
            Schema::Number { min, max } => match value.as_f64() {
                Some(n) => {
                    let below = min.is_some_and(|m| n < m);
                    let above = max.is_some_and(|m| n > m);
                    if below || above {
                        issues.push(Issue::new(
                            path,
                            IssueKind::OutOfRange {
                                value: n,
                                min: *min,
                                max: *max,
                            },
                        ));
                    }
                    value.clone()
                }
                None => {
                    issues.push(Issue::wrong_type(path, "number", value));
                    Value::Null
                }
            },
            Schema::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => value.clone(),
                Some(s) => {
                    issues.push(Issue::new(
                        path,
                        IssueKind::NotInEnum {
                            value: s.to_string(),
                            allowed,
                        },
                    ));
                    Value::Null
                }
                None => {
                    issues.push(Issue::wrong_type(path, "string", value));
                    Value::Null
                }
            },
            Schema::Id => match value {
                Value::String(_) => value.clone(),
                Value::Number(n) => Value::String(n.to_string()),
                other => {
                    issues.push(Issue::wrong_type(path, "string or number", other));
                    Value::Null
                }
            },
            Schema::Array(item) => match value.as_array() {
                Some(items) => Value::Array(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, v)| item.walk(v, &format!("{path}/{i}"), issues))
                        .collect(),
                ),
                None => {
                    issues.push(Issue::wrong_type(path, "array", value));
                    Value::Null
                }
            },
            Schema::Object(fields) => match value.as_object() {
                Some(map) => Value::Object(walk_fields(fields, map, path, issues)),
                None => {
                    issues.push(Issue::wrong_type(path, "object", value));
                    Value::Null
                }
            },
            Schema::Nullable(inner) => {
                if value.is_null() {
                    Value::Null
                } else {
                    inner.walk(value, path, issues)
                }
            }
            Schema::Either(left, right) => {
                let mut first = Vec::new();
                let out = left.walk(value, path, &mut first);
                if first.is_empty() {
                    return out;
                }
                let mut second = Vec::new();
                let out = right.walk(value, path, &mut second);
                if second.is_empty() {
                    return out;
                }
                issues.extend(first);
                Value::Null
            }
        }
    }
}

fn walk_fields(
    fields: &[Field],
    map: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        let child = format!("{path}/{}", field.name);
        // 可选字段上的 null 视为缺省（可空字段除外）
        let present = map
            .get(field.name)
            .filter(|v| !(v.is_null() && field.presence != Presence::Required && !field.schema.accepts_null()));

        match (present, &field.presence) {
            (Some(v), _) => {
                let normalized = field.schema.walk(v, &child, issues);
                out.insert(field.name.to_string(), normalized);
            }
            (None, Presence::Required) => issues.push(Issue::new(&child, IssueKind::Missing)),
            (None, Presence::Optional) => {}
            (None, Presence::Default(default)) => {
                out.insert(field.name.to_string(), default.clone());
            }
        }
    }
    out
}

/// 整数判定：接受 JSON 整数，以及小数部分为零的浮点数
fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl StringRule {
    fn check(&self, s: &str, path: &str, issues: &mut Vec<Issue>) {
        let len = s.chars().count();
        if len < self.min_len {
            issues.push(Issue::new(
                path,
                IssueKind::TooShort {
                    min: self.min_len,
                    len,
                },
            ));
            return;
        }
        let well_formed = match self.format {
            None => true,
            Some(StringFormat::Url) => url::Url::parse(s).is_ok(),
            Some(StringFormat::Email) => is_email(s),
        };
        if let (false, Some(format)) = (well_formed, self.format) {
            issues.push(Issue::new(path, IssueKind::InvalidFormat(format)));
        }
    }
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

// =========================================================
// 校验错误
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    NotInEnum {
        value: String,
        allowed: &'static [&'static str],
    },
    OutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    TooShort {
        min: usize,
        len: usize,
    },
    InvalidFormat(StringFormat),
    /// 规范化后的载荷仍无法反序列化为目标类型
    Decode(String),
}

/// 单条校验问题，`path` 为 JSON Pointer 形式（根为空串）
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub path: String,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(path: &str, kind: IssueKind) -> Self {
        Self {
            path: path.to_string(),
            kind,
        }
    }

    fn wrong_type(path: &str, expected: &'static str, found: &Value) -> Self {
        Self::new(
            path,
            IssueKind::WrongType {
                expected,
                found: json_type_name(found),
            },
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        match &self.kind {
            IssueKind::Missing => write!(f, "{path}: required field missing"),
            IssueKind::WrongType { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
            IssueKind::NotInEnum { value, allowed } => {
                write!(f, "{path}: `{value}` is not one of {}", allowed.join("|"))
            }
            IssueKind::OutOfRange { value, min, max } => {
                write!(f, "{path}: {value} outside [")?;
                match min {
                    Some(m) => write!(f, "{m}")?,
                    None => write!(f, "-inf")?,
                }
                write!(f, ", ")?;
                match max {
                    Some(m) => write!(f, "{m}]"),
                    None => write!(f, "inf]"),
                }
            }
            IssueKind::TooShort { min, len } => {
                write!(f, "{path}: length {len} below minimum {min}")
            }
            IssueKind::InvalidFormat(format) => write!(f, "{path}: not a valid {format}"),
            IssueKind::Decode(msg) => write!(f, "{path}: {msg}"),
        }
    }
}

/// 载荷不符合声明的 Schema
#[derive(Debug, Clone, PartialEq, Error)]
#[error("payload failed validation: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(path: &str, kind: IssueKind) -> Self {
        Self {
            issues: vec![Issue::new(path, kind)],
        }
    }

    /// 是否存在指定路径上的问题
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =========================================================
// 资源绑定
// =========================================================

/// 一个可在网络边界校验的资源类型
///
/// 每种资源只有一个 Schema，所有读取路径都经由 [`validate`] 进入类型系统。
pub trait Resource: DeserializeOwned {
    fn schema() -> Schema;
}

/// 校验载荷并转换为类型化的值
pub fn validate<R: Resource>(payload: &Value) -> Result<R, ValidationError> {
    let normalized = R::schema().check(payload)?;
    serde_json::from_value(normalized)
        .map_err(|e| ValidationError::single("", IssueKind::Decode(e.to_string())))
}

/// 校验载荷，失败时记录日志并返回 `None`
pub fn safe_validate<R: Resource>(payload: &Value) -> Option<R> {
    match validate::<R>(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Validation failed: {}", e);
            None
        }
    }
}

impl Resource for Value {
    fn schema() -> Schema {
        Schema::Any
    }
}

impl<R: Resource> Resource for Vec<R> {
    fn schema() -> Schema {
        Schema::array(R::schema())
    }
}
