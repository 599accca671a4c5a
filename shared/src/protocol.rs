use crate::account::{AuthResponse, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest, User};
use crate::content::{Acknowledgement, ContactMessage, NewContactMessage, SubscribeRequest};
use crate::schema::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

/// Endpoint paths relative to the API base URL.
///
/// All paths keep the trailing slash the backend router expects.
pub mod paths {
    use crate::content::LikeTarget;
    use crate::cv::CvSection;

    pub const PROJECTS: &str = "/projects/";
    pub const SKILLS: &str = "/projects/skills/";
    pub const SETTINGS: &str = "/settings/";
    pub const CV: &str = "/cv/";
    // 内容模块挂载在 settings 之下
    pub const ABOUT: &str = "/settings/about/";
    pub const CONTACT: &str = "/settings/contact/";
    pub const CONTACT_MESSAGES: &str = "/settings/contact/messages/";
    pub const SUBSCRIBE: &str = "/settings/subscribe/";
    pub const UNSUBSCRIBE: &str = "/settings/unsubscribe/";
    pub const UPLOAD: &str = "/settings/upload/";

    pub const MY_LIKES: &str = "/interactions/my-likes/";
    pub const NOTIFICATIONS: &str = "/interactions/notifications/";

    pub const AUTH_LOGIN: &str = "/auth/login/";
    pub const AUTH_REGISTER: &str = "/auth/register/";
    pub const AUTH_LOGOUT: &str = "/auth/logout/";
    pub const AUTH_PROFILE: &str = "/auth/profile/";
    pub const AUTH_PROFILE_UPDATE: &str = "/auth/profile/update/";
    pub const AUTH_PASSWORD_CHANGE: &str = "/auth/password/change/";
    pub const ADMIN_USERS: &str = "/auth/admin/users/";

    pub fn project(slug: &str) -> String {
        format!("{PROJECTS}{slug}/")
    }

    pub fn skill(id: &str) -> String {
        format!("{SKILLS}{id}/")
    }

    pub fn cv_section(section: CvSection) -> String {
        format!("{CV}{}/", section.segment())
    }

    pub fn cv_entry(section: CvSection, id: &str) -> String {
        format!("{CV}{}/{id}/", section.segment())
    }

    pub fn contact_reply(id: &str) -> String {
        format!("{CONTACT}{id}/reply/")
    }

    pub fn like(target: LikeTarget, id: &str) -> String {
        format!("/interactions/like/{}/{id}/", target.segment())
    }

    pub fn notification_read(id: &str) -> String {
        format!("{NOTIFICATIONS}{id}/read/")
    }

    pub fn admin_user(id: &str) -> String {
        format!("{ADMIN_USERS}{id}/")
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The validated response type returned by this request.
    type Response: Resource;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base.
    fn path(&self) -> String;
}

// =========================================================
// Request Definitions
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::AUTH_LOGIN.to_string()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::AUTH_REGISTER.to_string()
    }
}

/// Invalidate the server-side token
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = Value;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::AUTH_LOGOUT.to_string()
    }
}

/// Fetch the profile of the token holder
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        paths::AUTH_PROFILE.to_string()
    }
}

impl ApiRequest for ProfileUpdate {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        paths::AUTH_PROFILE_UPDATE.to_string()
    }
}

impl ApiRequest for PasswordChange {
    type Response = Acknowledgement;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::AUTH_PASSWORD_CHANGE.to_string()
    }
}

impl ApiRequest for NewContactMessage {
    type Response = ContactMessage;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::CONTACT.to_string()
    }
}

impl ApiRequest for SubscribeRequest {
    type Response = Acknowledgement;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        paths::SUBSCRIBE.to_string()
    }
}
