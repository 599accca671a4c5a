//! 联系、订阅、互动与通知等站点内容模型

use crate::portfolio::ResourceId;
use crate::schema::{Field, Resource, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// =========================================================
// 联系消息
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub const WIRE: &'static [&'static str] = &["new", "read", "replied", "archived"];
}

/// 访客提交的联系表单
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for ContactMessage {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("name", Schema::string()),
            Field::required("email", Schema::email()),
            Field::with_default("subject", Schema::string(), json!("")),
            Field::required("message", Schema::string()),
            Field::with_default("status", Schema::enumeration(MessageStatus::WIRE), json!("new")),
            Field::optional("created_at", Schema::string()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub reply_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// 只携带提示信息的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Resource for Acknowledgement {
    fn schema() -> Schema {
        Schema::object(vec![Field::with_default(
            "message",
            Schema::string(),
            json!(""),
        )])
    }
}

// =========================================================
// 点赞
// =========================================================

/// 可点赞的内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Project,
    Media,
}

impl LikeTarget {
    pub fn segment(&self) -> &'static str {
        match self {
            LikeTarget::Project => "project",
            LikeTarget::Media => "media",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeToggle {
    pub liked: bool,
    #[serde(default)]
    pub message: String,
}

impl Resource for LikeToggle {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("liked", Schema::Bool),
            Field::with_default("message", Schema::string(), json!("")),
        ])
    }
}

// =========================================================
// 通知
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewProject,
    Update,
    Message,
    Like,
    System,
}

impl NotificationKind {
    pub const WIRE: &'static [&'static str] = &["new_project", "update", "message", "like", "system"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: ResourceId,
    pub notification_type: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Resource for Notification {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::with_default(
                "notification_type",
                Schema::enumeration(NotificationKind::WIRE),
                json!("system"),
            ),
            Field::required("title", Schema::string()),
            Field::with_default("message", Schema::string(), json!("")),
            Field::with_default("link", Schema::nullable(Schema::string()), Value::Null),
            Field::with_default("is_read", Schema::Bool, json!(false)),
            Field::optional("created_at", Schema::string()),
        ])
    }
}

// =========================================================
// 上传
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(default)]
    pub filename: String,
}

impl Resource for UploadResponse {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("url", Schema::non_empty()),
            Field::with_default("filename", Schema::string(), json!("")),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;

    #[test]
    fn test_notification_defaults() {
        let n: Notification = validate(&json!({"id": 5, "title": "New drone reel"})).unwrap();
        assert_eq!(n.notification_type, NotificationKind::System);
        assert!(!n.is_read);
        assert!(n.link.is_none());
    }

    #[test]
    fn test_notification_kind_snake_case() {
        let n: Notification = validate(&json!({
            "id": 5,
            "title": "Shipped",
            "notification_type": "new_project",
            "link": "/work/shipped"
        }))
        .unwrap();
        assert_eq!(n.notification_type, NotificationKind::NewProject);
        assert_eq!(n.link.as_deref(), Some("/work/shipped"));
    }

    #[test]
    fn test_like_toggle_requires_flag() {
        assert!(validate::<LikeToggle>(&json!({"message": "ok"})).is_err());
        let toggle: LikeToggle = validate(&json!({"liked": true})).unwrap();
        assert!(toggle.liked);
    }

    #[test]
    fn test_contact_message_status_default() {
        let msg: ContactMessage = validate(&json!({
            "id": "c1",
            "name": "Visitor",
            "email": "v@example.com",
            "message": "Hello"
        }))
        .unwrap();
        assert_eq!(msg.status, MessageStatus::New);
        assert_eq!(msg.subject, "");
    }

    #[test]
    fn test_upload_requires_url() {
        assert!(validate::<UploadResponse>(&json!({"filename": "a.png"})).is_err());
    }
}
