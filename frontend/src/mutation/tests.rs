use super::*;
use crate::testing::{Fixture, user_json};
use crate::web::{MemoryStorage, RequestBody};
use folio_shared::{AuthResponse, LoginRequest, paths};
use serde_json::{Value, json};
use std::cell::Cell;
use std::time::Duration;

// =========================================================
// 辅助函数
// =========================================================

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "pilot@example.com".to_string(),
        password: "secret".to_string(),
    }
}

fn login_mutation(fx: &Fixture) -> Mutation<LoginRequest, AuthResponse> {
    let session = fx.session.clone();
    let config = MutationConfig::new(paths::AUTH_LOGIN)
        .on_success(move |auth: &AuthResponse, _: &LoginRequest| {
            session.login(auth.user.clone(), auth.token.clone())
        });
    Mutation::new(fx.api.clone(), config)
}

// =========================================================
// 成功与失败
// =========================================================

#[tokio::test]
async fn test_login_returns_validated_response() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url(paths::AUTH_LOGIN),
        200,
        json!({"token": "abc", "user": user_json("admin"), "extra": true}),
    );
    let login = login_mutation(&fx);

    let auth = login.mutate(credentials()).await.unwrap();

    assert_eq!(auth.token, "abc");
    assert_eq!(auth.user.email, "pilot@example.com");
    assert!(fx.session.is_authenticated());
    let state = login.state();
    assert_eq!(state.data, Some(auth));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_failed_mutation_returns_none() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url(paths::AUTH_LOGIN),
        400,
        json!({"error": "Invalid credentials"}),
    );
    let failures = Rc::new(RefCell::new(Vec::new()));
    let sink = failures.clone();
    let config = MutationConfig::new(paths::AUTH_LOGIN).on_error(
        move |e: &ApiError, params: &LoginRequest| {
            sink.borrow_mut().push((e.status, params.email.clone()))
        },
    );
    let login: Mutation<LoginRequest, AuthResponse> = Mutation::new(fx.api.clone(), config);

    assert!(login.mutate(credentials()).await.is_none());

    let state = login.state();
    assert_eq!(state.error.unwrap().message, "Invalid credentials");
    assert!(!state.loading);
    assert!(!fx.session.is_authenticated());
    assert_eq!(
        *failures.borrow(),
        vec![(400, "pilot@example.com".to_string())]
    );
}

#[tokio::test]
async fn test_invalid_response_is_error() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url(paths::AUTH_LOGIN),
        201,
        json!({"token": "", "user": user_json("admin")}),
    );
    let login = login_mutation(&fx);

    assert!(login.mutate(credentials()).await.is_none());
    let error = login.state().error.unwrap();
    assert!(error.message.contains("/token"));
    assert_eq!(error.status, 201);
    assert!(!fx.session.is_authenticated());
}

#[tokio::test]
async fn test_reset_clears_state() {
    let fx = Fixture::new();
    let login = login_mutation(&fx);
    login.mutate(credentials()).await;
    assert!(login.state().error.is_some());

    login.reset();

    assert_eq!(login.state(), MutationState::default());
}

// =========================================================
// 请求形态
// =========================================================

#[tokio::test]
async fn test_delete_sends_no_body() {
    let fx = Fixture::new();
    fx.transport
        .mock_response(HttpMethod::Delete, &Fixture::url("/projects/alpha/"), 204, json!(null));
    let remove: Mutation<String, Value> = Mutation::new(
        fx.api.clone(),
        MutationConfig::dynamic(|slug: &String| paths::project(slug))
            .method(MutationMethod::Delete),
    );

    let result = remove.mutate("alpha".to_string()).await;

    assert_eq!(result, Some(json!({})));
    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_unit_params_send_no_body() {
    let fx = Fixture::new();
    fx.transport
        .mock_response(HttpMethod::Post, &Fixture::url(paths::AUTH_LOGOUT), 200, json!({}));
    let logout: Mutation<(), Value> =
        Mutation::new(fx.api.clone(), MutationConfig::new(paths::AUTH_LOGOUT));

    assert!(logout.mutate(()).await.is_some());
    assert_eq!(fx.transport.last_request().unwrap().body, RequestBody::Empty);
}

#[tokio::test]
async fn test_patch_sends_params() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Patch,
        &Fixture::url("/settings/"),
        200,
        json!({"site_name": "Folio"}),
    );
    let update: Mutation<Value, Value> = Mutation::new(
        fx.api.clone(),
        MutationConfig::new("/settings/").method(MutationMethod::Patch),
    );

    update.mutate(json!({"site_name": "Folio"})).await.unwrap();

    let req = fx.transport.last_request().unwrap();
    assert_eq!(
        req.body,
        RequestBody::Json(r#"{"site_name":"Folio"}"#.to_string())
    );
}

#[tokio::test]
async fn test_success_invalidates_cache() {
    let fx = Fixture::new();
    let cache = ResourceCache::new(Rc::new(MemoryStorage::new()), Duration::from_secs(60));
    cache.put(paths::PROJECTS, &json!({"count": 0, "results": []}));
    fx.transport
        .mock_response(HttpMethod::Delete, &Fixture::url("/projects/alpha/"), 204, json!(null));
    let remove: Mutation<String, Value> = Mutation::new(
        fx.api.clone(),
        MutationConfig::dynamic(|slug: &String| paths::project(slug))
            .method(MutationMethod::Delete)
            .invalidates(cache.clone(), &[paths::PROJECTS]),
    );

    remove.mutate("alpha".to_string()).await;

    assert!(cache.get(paths::PROJECTS).unwrap().stale);
}

#[tokio::test]
async fn test_failure_keeps_cache_fresh() {
    let fx = Fixture::new();
    let cache = ResourceCache::new(Rc::new(MemoryStorage::new()), Duration::from_secs(60));
    cache.put(paths::PROJECTS, &json!({"count": 0, "results": []}));
    let remove: Mutation<String, Value> = Mutation::new(
        fx.api.clone(),
        MutationConfig::dynamic(|slug: &String| paths::project(slug))
            .method(MutationMethod::Delete)
            .invalidates(cache.clone(), &[paths::PROJECTS]),
    );

    assert!(remove.mutate("missing".to_string()).await.is_none());
    assert!(!cache.get(paths::PROJECTS).unwrap().stale);
}

// =========================================================
// 卸载
// =========================================================

#[tokio::test]
async fn test_unmounted_mutation_still_returns_result() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url(paths::AUTH_LOGIN),
        200,
        json!({"token": "abc", "user": user_json("visitor")}),
    );
    let gate = fx.transport.gate(HttpMethod::Post, &Fixture::url(paths::AUTH_LOGIN));
    let login = login_mutation(&fx);
    let commits = Rc::new(Cell::new(0));
    let counter = commits.clone();
    login.subscribe(move |_| counter.set(counter.get() + 1));

    let (result, _) = futures::join!(login.mutate(credentials()), async {
        login.unmount();
        let _ = gate.send(());
    });

    assert_eq!(result.unwrap().token, "abc");
    assert_eq!(commits.get(), 1);
    assert!(login.state().data.is_none());
    // 卸载后不再触发回调
    assert!(!fx.session.is_authenticated());
}
