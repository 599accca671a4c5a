pub mod account;
pub mod content;
pub mod cv;
pub mod date;
pub mod portfolio;
pub mod protocol;
pub mod schema;

pub use account::{AuthResponse, LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest, User, UserRole};
pub use content::{
    Acknowledgement, ContactMessage, LikeTarget, LikeToggle, MessageStatus, NewContactMessage,
    Notification, NotificationKind, ReplyRequest, SubscribeRequest, UploadResponse,
};
pub use cv::{
    Certification, CvData, CvProject, CvSection, CvSkill, Education, Experience, Interest,
    Language, PersonalInfo,
};
pub use date::Timestamp;
pub use portfolio::{
    Category, Coordinate, MediaItem, MediaType, Paginated, Project, ResourceId, SiteSettings, Skill,
    SkillCategory,
};
pub use protocol::{ApiRequest, HttpMethod, LogoutRequest, ProfileRequest, paths};
pub use schema::{Field, Issue, IssueKind, Presence, Resource, Schema, ValidationError};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 后端 API 默认根地址（本地开发环境）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
/// 默认认证方案，请求头形如 `Authorization: Bearer <token>`
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 持久化存储中的会话键
pub const STORAGE_KEY_TOKEN: &str = "auth_token";
pub const STORAGE_KEY_USER: &str = "auth_user";

/// 响应缓存键前缀，完整键为 `前缀 + endpoint`
pub const PREFIX_CACHE: &str = "folio.cache:";
