use super::*;
use crate::error::{ErrorKind, NETWORK_ERROR_STATUS};
use crate::testing::{Fixture, project_page, user_json};
use folio_shared::{AuthResponse, LoginRequest, Paginated, Project};
use rstest::rstest;

// =========================================================
// URL 与请求头
// =========================================================

#[test]
fn test_url_join_and_query_encoding() {
    let fx = Fixture::new();
    assert_eq!(fx.api.url("/projects/", &[]), "http://api.test/api/projects/");
    assert_eq!(fx.api.url("projects/", &[]), "http://api.test/api/projects/");
    assert_eq!(
        fx.api.url(
            "/projects/",
            &[("category", "Drone".to_string()), ("q", "a b&c".to_string())]
        ),
        "http://api.test/api/projects/?category=Drone&q=a+b%26c"
    );
}

#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let fx = Fixture::new();
    fx.transport
        .mock_response(HttpMethod::Get, &Fixture::url("/settings/"), 200, json!({}));

    fx.api.get("/settings/", &[]).await.unwrap();

    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.header("Authorization"), None);
    assert_eq!(req.header("Content-Type"), None);
    assert_eq!(req.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_token_attached_when_logged_in() {
    let fx = Fixture::new();
    let user = validate(&user_json("admin")).unwrap();
    fx.session.login(user, "abc123".to_string());
    fx.transport
        .mock_response(HttpMethod::Delete, &Fixture::url("/projects/x/"), 204, json!(null));

    let value = fx.api.delete("/projects/x/").await.unwrap();

    assert_eq!(value, json!({}));
    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.header("Authorization"), Some("Bearer abc123"));
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url("/settings/subscribe/"),
        201,
        json!({"message": "Subscribed"}),
    );

    let value = fx
        .api
        .post("/settings/subscribe/", &json!({"email": "a@b.co"}))
        .await
        .unwrap();

    assert_eq!(value["message"], "Subscribed");
    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert_eq!(req.body, RequestBody::Json(r#"{"email":"a@b.co"}"#.to_string()));
}

#[tokio::test]
async fn test_upload_uses_multipart_without_content_type() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url("/settings/upload/"),
        201,
        json!({"url": "https://cdn.example.com/a.png", "filename": "a.png"}),
    );
    let part = FilePart {
        field: UPLOAD_FIELD.to_string(),
        file_name: "a.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![1, 2, 3],
    };

    let uploaded: folio_shared::UploadResponse = fx
        .api
        .upload_as("/settings/upload/", part.clone())
        .await
        .unwrap();

    assert_eq!(uploaded.filename, "a.png");
    let req = fx.transport.last_request().unwrap();
    assert_eq!(req.header("Content-Type"), None);
    assert_eq!(req.body, RequestBody::Multipart(part));
}

// =========================================================
// 错误归一
// =========================================================

#[rstest]
#[case(json!({"message": "server error"}), "server error")]
#[case(json!({"detail": "Not found."}), "Not found.")]
#[case(json!({"error": "Invalid credentials"}), "Invalid credentials")]
#[case(json!({"error": {"code": "E1", "message": "Bad slug", "details": {}}}), "Bad slug")]
#[case(json!({"non_field_errors": ["Passwords do not match"]}), "Passwords do not match")]
#[case(json!({"message": "", "detail": "fallback"}), "fallback")]
#[case(json!({"email": ["This field is required."]}), "HTTP Error: 500")]
fn test_extract_error_message(#[case] body: Value, #[case] expected: &str) {
    let response = HttpResponse {
        status: 500,
        status_text: "Internal Server Error".to_string(),
        body: body.to_string(),
    };
    let err = interpret(response).unwrap_err();
    assert_eq!(err.message, expected);
    assert_eq!(err.status, 500);
    assert_eq!(err.payload, Some(body));
}

#[rstest]
#[case("Bad Gateway", "Bad Gateway")]
#[case("", "HTTP Error: 502")]
fn test_non_json_error_uses_status_text(#[case] status_text: &str, #[case] expected: &str) {
    let response = HttpResponse {
        status: 502,
        status_text: status_text.to_string(),
        body: "<html>upstream down</html>".to_string(),
    };
    let err = interpret(response).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Http);
    assert_eq!(err.message, expected);
    assert!(err.payload.is_none());
}

#[test]
fn test_non_json_success_is_validation_error() {
    let response = HttpResponse {
        status: 200,
        status_text: "OK".to_string(),
        body: "<html></html>".to_string(),
    };
    let err = interpret(response).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_message() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Get,
        &Fixture::url("/projects/"),
        500,
        json!({"message": "server error"}),
    );

    let err = fx.api.get("/projects/", &[]).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(err.message, "server error");
}

#[tokio::test]
async fn test_network_failure_has_status_zero() {
    let fx = Fixture::new();
    fx.transport
        .mock_network_failure(HttpMethod::Get, &Fixture::url("/projects/"));

    let err = fx.api.get("/projects/", &[]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(err.status, NETWORK_ERROR_STATUS);
}

// =========================================================
// 类型化接口
// =========================================================

#[tokio::test]
async fn test_get_as_validates_page() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Get,
        &Fixture::url("/projects/"),
        200,
        project_page(&["a", "b", "c"]),
    );

    let page: Paginated<Project> = fx.api.get_as("/projects/", &[]).await.unwrap();
    assert_eq!(page.results.len(), 3);
}

#[tokio::test]
async fn test_get_as_rejects_invalid_payload() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Get,
        &Fixture::url("/projects/"),
        200,
        json!({"results": "nope"}),
    );

    let err = fx
        .api
        .get_as::<Paginated<Project>>("/projects/", &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("/count"));
}

#[tokio::test]
async fn test_send_declared_request() {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url("/auth/login/"),
        200,
        json!({"token": "T", "user": user_json("admin")}),
    );
    let login = LoginRequest {
        email: "pilot@example.com".to_string(),
        password: "secret".to_string(),
    };

    let auth: AuthResponse = fx.api.send(&login).await.unwrap();

    assert_eq!(auth.token, "T");
    assert!(auth.user.is_admin());
    let req = fx.transport.last_request().unwrap();
    let RequestBody::Json(body) = req.body else {
        panic!("expected JSON body");
    };
    let sent: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(sent["password"], "secret");
}

#[rstest]
#[case::ok(200)]
#[case::created(201)]
#[tokio::test]
async fn test_validation_error_keeps_response_status(#[case] status: u16) {
    let fx = Fixture::new();
    fx.transport.mock_response(
        HttpMethod::Post,
        &Fixture::url("/auth/login/"),
        status,
        json!({"token": ""}),
    );
    let login = LoginRequest {
        email: "pilot@example.com".to_string(),
        password: "secret".to_string(),
    };

    let err = fx.api.send(&login).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.status, status);
}
