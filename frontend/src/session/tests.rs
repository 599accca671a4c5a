use super::*;
use crate::testing::{Fixture, user_json};
use crate::web::MemoryStorage;
use folio_shared::HttpMethod;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

fn admin() -> User {
    validate(&user_json("admin")).unwrap()
}

fn visitor() -> User {
    validate(&user_json("visitor")).unwrap()
}

fn seeded_storage(token: Option<&str>, user: Option<&str>) -> Rc<MemoryStorage> {
    let storage = Rc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set(STORAGE_KEY_TOKEN, token).unwrap();
    }
    if let Some(user) = user {
        storage.set(STORAGE_KEY_USER, user).unwrap();
    }
    storage
}

// =========================================================
// login / logout
// =========================================================

#[test]
fn test_login_persists_token_and_user() {
    let storage = Rc::new(MemoryStorage::new());
    let session = SessionHandle::new(storage.clone());

    session.login(admin(), "T".to_string());

    assert!(session.is_authenticated());
    assert!(session.is_admin());
    assert_eq!(session.token().as_deref(), Some("T"));
    assert_eq!(storage.get(STORAGE_KEY_TOKEN).as_deref(), Some("T"));
    let stored: serde_json::Value =
        serde_json::from_str(&storage.get(STORAGE_KEY_USER).unwrap()).unwrap();
    assert_eq!(stored["email"], "pilot@example.com");
    assert_eq!(stored["user_type"], "admin");
}

#[test]
fn test_failed_user_write_leaves_no_token_behind() {
    let storage = Rc::new(MemoryStorage::new());
    storage.reject_writes_to(STORAGE_KEY_USER);
    let session = SessionHandle::new(storage.clone());

    session.login(admin(), "T".to_string());

    // 内存中仍处于登录状态，存储中两个键都不存在
    assert!(session.is_authenticated());
    assert!(!storage.contains(STORAGE_KEY_TOKEN));
    assert!(!storage.contains(STORAGE_KEY_USER));
    assert!(!SessionHandle::restore(storage).is_authenticated());
}

#[test]
fn test_logout_clears_storage() {
    let storage = Rc::new(MemoryStorage::new());
    let session = SessionHandle::new(storage.clone());
    session.login(admin(), "T".to_string());

    session.logout();

    assert!(!session.is_authenticated());
    assert!(session.current_user().is_none());
    assert!(!storage.contains(STORAGE_KEY_TOKEN));
    assert!(!storage.contains(STORAGE_KEY_USER));
}

#[test]
fn test_visitor_is_not_admin() {
    let session = SessionHandle::new(Rc::new(MemoryStorage::new()));
    session.login(visitor(), "V".to_string());
    assert!(session.is_authenticated());
    assert!(!session.is_admin());
}

// =========================================================
// restore
// =========================================================

#[test]
fn test_restore_round_trip() {
    let storage = Rc::new(MemoryStorage::new());
    SessionHandle::new(storage.clone()).login(admin(), "T".to_string());

    let restored = SessionHandle::restore(storage);
    assert_eq!(restored.token().as_deref(), Some("T"));
    assert_eq!(restored.current_user(), Some(admin()));
}

#[test]
fn test_restore_requires_both_keys() {
    let storage = seeded_storage(Some("T"), None);
    let session = SessionHandle::restore(storage.clone());
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());

    let user = user_json("admin").to_string();
    let storage = seeded_storage(None, Some(&user));
    let session = SessionHandle::restore(storage.clone());
    assert!(!session.is_authenticated());
    assert!(storage.is_empty());
}

#[test]
fn test_restore_discards_invalid_user_record() {
    let bad = json!({"id": 1, "email": "x@example.com", "user_type": "root"}).to_string();
    let storage = seeded_storage(Some("T"), Some(&bad));
    let session = SessionHandle::restore(storage.clone());
    assert!(!session.is_authenticated());
    assert!(!storage.contains(STORAGE_KEY_TOKEN));

    let storage = seeded_storage(Some("T"), Some("{not json"));
    assert!(!SessionHandle::restore(storage).is_authenticated());
}

// =========================================================
// 订阅
// =========================================================

#[test]
fn test_observers_receive_transitions() {
    let session = SessionHandle::new(Rc::new(MemoryStorage::new()));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = session.subscribe(move |s| sink.borrow_mut().push(s.is_authenticated()));

    session.login(admin(), "T".to_string());
    session.logout();
    session.unsubscribe(id);
    session.login(admin(), "T".to_string());

    assert_eq!(*seen.borrow(), vec![true, false]);
}

// =========================================================
// verify
// =========================================================

fn logged_in_fixture() -> Fixture {
    let fx = Fixture::new();
    fx.session.login(admin(), "T".to_string());
    fx
}

#[tokio::test]
async fn test_verify_anonymous_sends_nothing() {
    let fx = Fixture::new();
    assert_eq!(fx.session.verify(&fx.api).await, Verification::Anonymous);
    assert_eq!(fx.transport.request_count(), 0);
}

#[tokio::test]
async fn test_verify_refreshes_user() {
    let fx = logged_in_fixture();
    let mut profile = user_json("admin");
    profile["first_name"] = json!("Kaia");
    fx.transport
        .mock_response(HttpMethod::Get, &Fixture::url("/auth/profile/"), 200, profile);

    assert_eq!(fx.session.verify(&fx.api).await, Verification::Valid);
    assert_eq!(fx.session.current_user().unwrap().first_name, "Kaia");
    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer T"));
}

#[tokio::test]
async fn test_verify_rejected_token_logs_out() {
    let fx = logged_in_fixture();
    fx.transport.mock_response(
        HttpMethod::Get,
        &Fixture::url("/auth/profile/"),
        401,
        json!({"detail": "Invalid token."}),
    );

    assert_eq!(fx.session.verify(&fx.api).await, Verification::Rejected);
    assert!(!fx.session.is_authenticated());
    assert!(!fx.storage.contains(STORAGE_KEY_TOKEN));
}

#[tokio::test]
async fn test_verify_network_failure_keeps_session() {
    let fx = logged_in_fixture();
    fx.transport
        .mock_network_failure(HttpMethod::Get, &Fixture::url("/auth/profile/"));

    assert_eq!(fx.session.verify(&fx.api).await, Verification::Inconclusive);
    assert!(fx.session.is_authenticated());
}
