//! 账户与认证相关模型

use crate::portfolio::ResourceId;
use crate::schema::{Field, Resource, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Registered,
    Visitor,
}

impl UserRole {
    pub const WIRE: &'static [&'static str] = &["admin", "registered", "visitor"];

    /// 线上取值，亦用作界面展示标签
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => Self::WIRE[0],
            UserRole::Registered => Self::WIRE[1],
            UserRole::Visitor => Self::WIRE[2],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ResourceId,
    pub email: String,
    #[serde(rename = "user_type")]
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 姓名为空时回退到邮箱
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

impl Resource for User {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("id", Schema::Id),
            Field::required("email", Schema::email()),
            Field::required("user_type", Schema::enumeration(UserRole::WIRE)),
            Field::required("first_name", Schema::string()),
            Field::required("last_name", Schema::string()),
            Field::with_default("profile_image", Schema::nullable(Schema::string()), Value::Null),
        ])
    }
}

/// 登录/注册成功后的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl Resource for AuthResponse {
    fn schema() -> Schema {
        Schema::object(vec![
            Field::required("token", Schema::non_empty()),
            Field::required("user", User::schema()),
        ])
    }
}

// =========================================================
// 请求体
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirm
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate;
    use rstest::rstest;
    use serde_json::json;

    fn user_payload() -> Value {
        json!({
            "id": 12,
            "email": "admin@example.com",
            "user_type": "admin",
            "first_name": "Sam",
            "last_name": "",
            "date_joined": "2024-01-01"
        })
    }

    #[test]
    fn test_user_normalized() {
        let user: User = validate(&user_payload()).unwrap();
        assert_eq!(user.id.as_str(), "12");
        assert!(user.is_admin());
        assert_eq!(user.profile_image, None);
        assert_eq!(user.display_name(), "Sam");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut payload = user_payload();
        payload["first_name"] = json!("");
        let user: User = validate(&payload).unwrap();
        assert_eq!(user.display_name(), "admin@example.com");
    }

    #[rstest]
    #[case::admin("admin", UserRole::Admin)]
    #[case::registered("registered", UserRole::Registered)]
    #[case::visitor("visitor", UserRole::Visitor)]
    fn test_role_label_follows_wire_value(#[case] wire: &str, #[case] role: UserRole) {
        let mut payload = user_payload();
        payload["user_type"] = json!(wire);
        let user: User = validate(&payload).unwrap();
        assert_eq!(user.role, role);
        assert_eq!(user.role.label(), wire);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let mut payload = user_payload();
        payload["user_type"] = json!("superuser");
        assert!(validate::<User>(&payload).is_err());
    }

    #[test]
    fn test_auth_response_requires_token() {
        let payload = json!({"token": "", "user": user_payload()});
        let err = validate::<AuthResponse>(&payload).unwrap_err();
        assert!(err.has_issue_at("/token"));
    }

    #[test]
    fn test_user_round_trips_through_storage_form() {
        let user: User = validate(&user_payload()).unwrap();
        let stored = serde_json::to_value(&user).unwrap();
        assert_eq!(stored["user_type"], "admin");
        let restored: User = validate(&stored).unwrap();
        assert_eq!(restored, user);
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Pilot".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({"bio": "Pilot"}));
    }
}
