//! 作品集领域模型：项目、媒体、技能、站点设置与分页包装

use crate::schema::{Field, Resource, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

// =========================================================
// 标识符
// =========================================================

/// 资源标识符
///
/// 后端可能返回数字或字符串 ID，校验层统一规范化为字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

// =========================================================
// 项目与媒体
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Development,
    Drone,
    Mixed,
}

impl Category {
    pub const WIRE: &'static [&'static str] = &["Development", "Drone", "Mixed"];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Development => "Development",
            Category::Drone => "Drone",
            Category::Mixed => "Mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub const WIRE: &'static [&'static str] = &["image", "video"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: ResourceId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub order: u32,
}

impl Resource for MediaItem {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("type", Schema::enumeration(MediaType::WIRE)),
            Field::required("url", Schema::url()),
            Field::with_default("order", Schema::non_negative_int(), json!(0)),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ResourceId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Category,
    pub thumbnail: String,
    pub created_at: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl Project {
    /// 媒体按 `order` 升序排列
    pub fn ordered_media(&self) -> Vec<&MediaItem> {
        let mut media: Vec<&MediaItem> = self.media.iter().collect();
        media.sort_by_key(|item| item.order);
        media
    }
}

impl Resource for Project {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("title", Schema::non_empty()),
            Field::required("slug", Schema::non_empty()),
            Field::required("description", Schema::string()),
            Field::required("category", Schema::enumeration(Category::WIRE)),
            Field::required("thumbnail", Schema::url()),
            Field::required("created_at", Schema::string()),
            Field::with_default("featured", Schema::Bool, json!(false)),
            Field::with_default("technologies", Schema::array(Schema::string()), json!([])),
            Field::with_default("media", Schema::array(MediaItem::schema()), json!([])),
        ])
    }
}

// =========================================================
// 技能
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    DevOps,
    Drone,
    Editing,
}

impl SkillCategory {
    pub const WIRE: &'static [&'static str] = &["Frontend", "Backend", "DevOps", "Drone", "Editing"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: ResourceId,
    pub name: String,
    pub level: u8,
    pub category: SkillCategory,
}

impl Resource for Skill {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::non_empty()),
            Field::required("level", Schema::int_range(0, 100)),
            Field::required("category", Schema::enumeration(SkillCategory::WIRE)),
        ])
    }
}

// =========================================================
// 站点设置
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_tagline: String,
    pub about_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drone_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl SiteSettings {
    pub const DEFAULT_HERO_TITLE: &'static str = "ACTIVE";
    pub const DEFAULT_HERO_SUBTITLE: &'static str = "THEORY";
    pub const DEFAULT_HERO_TAGLINE: &'static str = "Digital Experiences & Aerial Visuals";
    pub const DEFAULT_ABOUT_TITLE: &'static str = "THE MIND BEHIND";

    /// 社交链接中非空的部分，按 (平台, 链接) 返回
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Instagram", &self.instagram_url),
            ("LinkedIn", &self.linkedin_url),
            ("GitHub", &self.github_url),
        ]
        .into_iter()
        .filter_map(|(name, url)| {
            url.as_deref()
                .filter(|u| !u.is_empty())
                .map(|u| (name, u))
        })
        .collect()
    }
}

/// 坐标值，保留后端给出的原始形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Degrees(f64),
    Decimal(String),
}

impl Coordinate {
    /// 以度为单位的数值；无法解析的字符串返回 `None`
    pub fn degrees(&self) -> Option<f64> {
        match self {
            Coordinate::Degrees(v) => Some(*v),
            Coordinate::Decimal(s) => s.trim().parse().ok(),
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            hero_title: Self::DEFAULT_HERO_TITLE.to_string(),
            hero_subtitle: Self::DEFAULT_HERO_SUBTITLE.to_string(),
            hero_tagline: Self::DEFAULT_HERO_TAGLINE.to_string(),
            about_title: Self::DEFAULT_ABOUT_TITLE.to_string(),
            about_quote: None,
            profile_image: None,
            drone_image: None,
            location: None,
            latitude: None,
            longitude: None,
            instagram_url: None,
            linkedin_url: None,
            github_url: None,
            footer_text: None,
            copyright_year: None,
            version: None,
        }
    }
}

/// 经纬度：数字，或 DRF `DecimalField` 序列化出的字符串
fn coordinate() -> Schema {
    Schema::number().or(Schema::string())
}

/// 社交链接：合法 URL 或空串
fn social_url() -> Schema {
    Schema::url().or(Schema::enumeration(&[""]))
}

impl Resource for SiteSettings {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::with_default("hero_title", Schema::string(), json!(Self::DEFAULT_HERO_TITLE)),
            Field::with_default(
                "hero_subtitle",
                Schema::string(),
                json!(Self::DEFAULT_HERO_SUBTITLE),
            ),
            Field::with_default(
                "hero_tagline",
                Schema::string(),
                json!(Self::DEFAULT_HERO_TAGLINE),
            ),
            Field::with_default("about_title", Schema::string(), json!(Self::DEFAULT_ABOUT_TITLE)),
            Field::optional("about_quote", Schema::string()),
            Field::optional("profile_image", Schema::string()),
            Field::optional("drone_image", Schema::string()),
            Field::optional("location", Schema::string()),
            Field::optional("latitude", coordinate()),
            Field::optional("longitude", coordinate()),
            Field::optional("instagram_url", social_url()),
            Field::optional("linkedin_url", social_url()),
            Field::optional("github_url", social_url()),
            Field::optional("footer_text", Schema::string()),
            Field::optional("copyright_year", Schema::integer()),
            Field::optional("version", Schema::string()),
        ])
    }
}

// =========================================================
// 分页
// =========================================================

/// 列表接口的分页包装
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<R> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<R>,
}

impl<R> Paginated<R> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

impl<R> Default for Paginated<R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<R: Resource> Resource for Paginated<R> {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("count", Schema::non_negative_int()),
            Field::with_default("next", Schema::nullable(Schema::string()), Value::Null),
            Field::with_default("previous", Schema::nullable(Schema::string()), Value::Null),
            Field::required("results", Schema::array(R::schema())),
        ])
    }
}
