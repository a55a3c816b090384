//! End-to-end tests driving the router with in-process requests.

use std::io::Read;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use coffeeco_backend::{
    auth::HashParams, config::Settings, router::create_router, storage::SqliteStore, AppState,
};
use flate2::read::GzDecoder;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    site: TempDir,
}

/// Router over an in-memory database and a temporary `dist/` tree
fn setup() -> TestApp {
    let site = tempfile::tempdir().unwrap();
    let assets = site.path().join("assets");
    std::fs::create_dir_all(assets.join("img")).unwrap();
    std::fs::write(assets.join("style.css"), "body { margin: 0; }").unwrap();
    std::fs::write(assets.join("img").join("logo.svg"), "<svg/>").unwrap();
    std::fs::write(site.path().join("secret.txt"), "do not serve").unwrap();
    std::fs::write(site.path().join("index.html"), "<html></html>").unwrap();
    std::fs::write(site.path().join("manifest.json"), "{}").unwrap();

    let settings = Settings {
        static_root: assets,
        site_root: site.path().to_path_buf(),
        hash: HashParams {
            log_n: 4,
            r: 8,
            p: 1,
        },
        ..Settings::default()
    };

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let state = Arc::new(AppState::new(store, settings));
    TestApp {
        router: create_router(state.clone()),
        state,
        site,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn gunzip(bytes: &[u8]) -> String {
    let mut out = String::new();
    GzDecoder::new(bytes).read_to_string(&mut out).unwrap();
    out
}

/// Extract the `LOGIN` value from a `Set-Cookie` header
fn login_token(response: &Response) -> String {
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.contains("Max-Age=31536000"));
    assert!(cookie.contains("Path=/"));
    cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("LOGIN="))
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_account_scenario() {
    let app = setup();

    let response = send(
        &app,
        post_json(
            "/api/user/add",
            serde_json::json!({"username": "alice", "password": "pw123", "email": "a@x.com"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await, serde_json::json!({"ID": 1}));

    let response = send(
        &app,
        post_json(
            "/api/user/add",
            serde_json::json!({"username": "alice", "password": "pw456", "email": "b@y.com"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "USER_001");

    let response = send(
        &app,
        post_json("/api/user/login", serde_json::json!({"id": 1, "password": "pw123"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = login_token(&response);
    assert!(!token.is_empty());

    let response = send(
        &app,
        get_with_cookie("/api/user/authtoid", &format!("LOGIN={token}")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"ID": 1}));

    let response = send(&app, get_with_cookie("/api/user/authtoid", "LOGIN=garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejections() {
    let app = setup();
    send(
        &app,
        post_json(
            "/api/user/add",
            serde_json::json!({"username": "bob", "password": "pw", "email": "b@y.com"}),
        ),
    )
    .await;

    let response = send(
        &app,
        post_json("/api/user/login", serde_json::json!({"id": 1, "password": "nope"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = send(
        &app,
        post_json("/api/user/login", serde_json::json!({"id": 7, "password": "pw"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_authtoid_without_cookie() {
    let app = setup();
    let response = send(&app, get("/api/user/authtoid")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "AUTH_002");
}

#[tokio::test]
async fn test_invalid_sign_up_is_rejected() {
    let app = setup();
    let response = send(
        &app,
        post_json(
            "/api/user/add",
            serde_json::json!({"username": "", "password": "pw", "email": "a@x.com"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn test_public_user_lookups() {
    let app = setup();
    send(
        &app,
        post_json(
            "/api/user/add",
            serde_json::json!({"username": "carol", "password": "pw", "email": "c@z.com"}),
        ),
    )
    .await;

    let response = send(&app, get("/api/user/getfromid/1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"ID": 1, "USERNAME": "carol"})
    );

    let response = send(&app, get("/api/user/getfromusername/carol")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ID"], 1);

    let response = send(&app, get("/api/user/getfromusername/dave")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serves_gzipped_asset() {
    let app = setup();
    let response = send(&app, get("/assets/style.css")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
    assert!(response.headers().contains_key(header::ETAG));
    assert_eq!(gunzip(&body_bytes(response).await), "body { margin: 0; }");
}

#[tokio::test]
async fn test_serves_nested_asset() {
    let app = setup();
    let response = send(&app, get("/assets/img/logo.svg")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(gunzip(&body_bytes(response).await), "<svg/>");
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let app = setup();
    let response = send(&app, get("/assets/missing.js")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_traversal_is_locked() {
    let app = setup();
    // Encoded so the client does not collapse the dots before routing
    let response = send(&app, get("/assets/..%2Fsecret.txt")).await;
    assert_eq!(response.status(), StatusCode::LOCKED);
}

#[tokio::test]
async fn test_conditional_asset_request() {
    let app = setup();
    let first = send(&app, get("/assets/style.css")).await;
    let etag = first.headers()[header::ETAG].clone();

    let request = Request::builder()
        .uri("/assets/style.css")
        .header(header::IF_NONE_MATCH, etag)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_pages_serve_index() {
    let app = setup();
    for uri in ["/", "/login", "/signup", "/about", "/users/alice"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(gunzip(&body_bytes(response).await), "<html></html>");
    }

    let response = send(&app, get("/manifest.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn test_last_modified_and_if_modified_since() {
    let app = setup();
    let first = send(&app, get("/assets/style.css")).await;
    assert_eq!(first.status(), StatusCode::OK);
    let last_modified = first.headers()[header::LAST_MODIFIED].clone();
    assert!(last_modified.to_str().unwrap().ends_with(" GMT"));

    let request = Request::builder()
        .uri("/assets/style.css")
        .header(header::IF_MODIFIED_SINCE, last_modified.clone())
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()[header::LAST_MODIFIED], last_modified);
    assert!(body_bytes(response).await.is_empty());

    let request = Request::builder()
        .uri("/assets/style.css")
        .header(header::IF_MODIFIED_SINCE, "Mon, 01 Jan 2001 00:00:00 GMT")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gunzip(&body_bytes(response).await), "body { margin: 0; }");
}

#[tokio::test]
async fn test_assets_are_cached_until_changed() {
    let app = setup();
    assert_eq!(app.state.assets.cached_entries(), 0);

    let first = send(&app, get("/assets/style.css")).await;
    let etag = first.headers()[header::ETAG].clone();
    send(&app, get("/assets/style.css")).await;
    send(&app, get("/assets/img/logo.svg")).await;
    assert_eq!(app.state.assets.cached_entries(), 2);

    std::fs::write(
        app.site.path().join("assets").join("style.css"),
        "body { margin: 0; padding: 0; }",
    )
    .unwrap();
    let response = send(&app, get("/assets/style.css")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_ne!(response.headers()[header::ETAG], etag);
    assert_eq!(
        gunzip(&body_bytes(response).await),
        "body { margin: 0; padding: 0; }"
    );
    assert_eq!(app.state.assets.cached_entries(), 2);
}
