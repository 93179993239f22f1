#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing;
use axum::Router;
use http_body_util::BodyExt;
use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use bloodbank::api::middleware::session::{AppState, SESSION_KEY_USERNAME, SESSION_KEY_USER_ID};
use bloodbank::config::Config;

pub const TEST_USERNAME: &str = "nurse";

pub fn test_config() -> Config {
    Config {
        database_url: Secret::new("postgres://bloodbank@127.0.0.1:1/bloodbank".to_string()),
        host: "127.0.0.1".to_string(),
        port: 0,
        session_ttl_hours: 1,
        secure_cookies: false,
        admin_username: None,
        admin_password: None,
    }
}

/// A pool pointing at a port nothing listens on. Every query fails fast,
/// which is what the degraded-page tests need.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(300))
        .connect_lazy("postgres://bloodbank@127.0.0.1:1/bloodbank")
        .unwrap()
}

/// Builds the application router with an in-memory session store and a
/// `/test/login` route that marks the session as logged in.
pub fn build_test_app(pool: PgPool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);

    let state = AppState {
        pool,
        config: test_config(),
    };

    bloodbank::api::router()
        .route("/test/login", routing::get(test_login))
        .layer(session_layer)
        .with_state(state)
}

async fn test_login(session: Session) -> StatusCode {
    session.insert(SESSION_KEY_USER_ID, Uuid::new_v4()).await.unwrap();
    session.insert(SESSION_KEY_USERNAME, TEST_USERNAME).await.unwrap();
    StatusCode::OK
}

/// Logs in through the test route and returns the session cookie
pub async fn login(app: &Router) -> String {
    let response = get(app, "/test/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response).expect("login should set a session cookie")
}

/// The `name=value` part of the first Set-Cookie header
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
