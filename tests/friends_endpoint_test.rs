use axum::http::StatusCode;
use noriuchi_log::api::{self, AppState};
use noriuchi_log::datasource::SessionSupplier;
use noriuchi_log::db::init_db;
use noriuchi_log::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let supplier: Arc<dyn SessionSupplier> = repo.clone();
    let app = api::create_router(AppState::new(repo, supplier));

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn sync_user(app: &axum::Router, id: &str, name: &str, email: &str) {
    let (status, _) = request(
        app.clone(),
        "PUT",
        "/v1/users/me",
        Some(id),
        Some(serde_json::json!({"name": name, "email": email})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn add_friend(app: &axum::Router, user: &str, email: &str) -> (StatusCode, serde_json::Value) {
    request(
        app.clone(),
        "POST",
        "/v1/friends",
        Some(user),
        Some(serde_json::json!({"email": email})),
    )
    .await
}

async fn setup_two_users(app: &axum::Router) {
    sync_user(app, "u1", "Alice", "alice@example.com").await;
    sync_user(app, "u2", "Bob", "bob@example.com").await;
}

#[tokio::test]
async fn test_friends_require_identity() {
    let test_app = setup_test_app().await;
    let (status, _) = request(test_app.app, "GET", "/v1/friends", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_accept_flow() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    let (status, json) = add_friend(&test_app.app, "u1", "bob@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "request sent");

    // Bob sees the incoming request with Alice's info.
    let (_, json) = request(
        test_app.app.clone(),
        "GET",
        "/v1/friends/requests",
        Some("u2"),
        None,
    )
    .await;
    let requests = json["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["from"]["id"], "u1");
    assert_eq!(requests[0]["from"]["name"], "Alice");
    let request_id = requests[0]["id"].as_str().unwrap().to_string();

    let (status, json) = request(
        test_app.app.clone(),
        "POST",
        "/v1/friends/respond",
        Some("u2"),
        Some(serde_json::json!({"requestId": request_id, "accept": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "request accepted");

    // Both sides now see each other.
    let (_, json) = request(test_app.app.clone(), "GET", "/v1/friends", Some("u1"), None).await;
    assert_eq!(json["friends"][0]["id"], "u2");
    let (_, json) = request(test_app.app.clone(), "GET", "/v1/friends", Some("u2"), None).await;
    assert_eq!(json["friends"][0]["id"], "u1");

    // Adding again is a friendly no-op.
    let (_, json) = add_friend(&test_app.app, "u1", "bob@example.com").await;
    assert_eq!(json["message"], "already friends");
}

#[tokio::test]
async fn test_reverse_pending_request_is_auto_accepted() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    let (_, json) = add_friend(&test_app.app, "u1", "bob@example.com").await;
    assert_eq!(json["message"], "request sent");

    // Bob adding Alice while her request is pending accepts it.
    let (_, json) = add_friend(&test_app.app, "u2", "alice@example.com").await;
    assert_eq!(json["message"], "request accepted");

    let (_, json) = request(test_app.app, "GET", "/v1/friends", Some("u1"), None).await;
    assert_eq!(json["friends"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_repeated_add_while_pending() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    add_friend(&test_app.app, "u1", "bob@example.com").await;
    let (_, json) = add_friend(&test_app.app, "u1", "bob@example.com").await;
    assert_eq!(json["message"], "request pending");
}

#[tokio::test]
async fn test_decline_deletes_the_request() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    add_friend(&test_app.app, "u1", "bob@example.com").await;
    let (_, json) = request(
        test_app.app.clone(),
        "GET",
        "/v1/friends/requests",
        Some("u2"),
        None,
    )
    .await;
    let request_id = json["requests"][0]["id"].as_str().unwrap().to_string();

    let (_, json) = request(
        test_app.app.clone(),
        "POST",
        "/v1/friends/respond",
        Some("u2"),
        Some(serde_json::json!({"requestId": request_id, "accept": false})),
    )
    .await;
    assert_eq!(json["message"], "request declined");

    // No friends on either side and the edge is gone, so Alice can retry.
    let (_, json) = request(test_app.app.clone(), "GET", "/v1/friends", Some("u1"), None).await;
    assert_eq!(json["friends"].as_array().unwrap().len(), 0);
    let (_, json) = add_friend(&test_app.app, "u1", "bob@example.com").await;
    assert_eq!(json["message"], "request sent");
}

#[tokio::test]
async fn test_add_friend_rejections() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    let (status, _) = add_friend(&test_app.app, "u1", "alice@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = add_friend(&test_app.app, "u1", "nobody@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = add_friend(&test_app.app, "u1", "not-an-email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_lookup_is_case_insensitive() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    let (status, json) = add_friend(&test_app.app, "u1", "BOB@Example.COM").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "request sent");
}

#[tokio::test]
async fn test_only_the_addressee_may_respond() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;
    sync_user(&test_app.app, "u3", "Carol", "carol@example.com").await;

    add_friend(&test_app.app, "u1", "bob@example.com").await;
    let (_, json) = request(
        test_app.app.clone(),
        "GET",
        "/v1/friends/requests",
        Some("u2"),
        None,
    )
    .await;
    let request_id = json["requests"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = request(
        test_app.app,
        "POST",
        "/v1/friends/respond",
        Some("u3"),
        Some(serde_json::json!({"requestId": request_id, "accept": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responding_twice_is_a_no_op() {
    let test_app = setup_test_app().await;
    setup_two_users(&test_app.app).await;

    add_friend(&test_app.app, "u1", "bob@example.com").await;
    let (_, json) = request(
        test_app.app.clone(),
        "GET",
        "/v1/friends/requests",
        Some("u2"),
        None,
    )
    .await;
    let request_id = json["requests"][0]["id"].as_str().unwrap().to_string();

    let respond = serde_json::json!({"requestId": request_id, "accept": true});
    let (_, first) = request(
        test_app.app.clone(),
        "POST",
        "/v1/friends/respond",
        Some("u2"),
        Some(respond.clone()),
    )
    .await;
    assert_eq!(first["message"], "request accepted");

    let (status, second) = request(
        test_app.app,
        "POST",
        "/v1/friends/respond",
        Some("u2"),
        Some(respond),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], "already handled");
}
