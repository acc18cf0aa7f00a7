use axum::{
    body::Body,
    http::{header, Request as HttpRequest},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::MemoryStore;
use crate::AppState;

pub const TEST_SECRET: &str = "unit-test-secret-unit-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// App state over a fresh in-memory store. The store handle is returned
/// separately so tests can inspect it without going through HTTP.
pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.cookie_secure = false;
    config.api.enable_request_logging = false;

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store.clone()).expect("test secret is non-empty");
    (state, store)
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// A signed-up user and the `Cookie` header value carrying their session.
pub struct Session {
    pub id: Uuid,
    pub cookie: String,
}

pub async fn send(app: &Router, method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = HttpRequest::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    app.clone().oneshot(request).await.expect("router is infallible")
}

/// `name=value` from the first `Set-Cookie` header, ready to send back.
pub fn session_cookie_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub async fn sign_up(app: &Router, username: &str) -> Session {
    let response = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(response.status(), 201, "signup for {}", username);
    let id = read_json(response).await["data"]["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("signup returns id");

    let response = send(
        app,
        "POST",
        "/api/auth/signin",
        None,
        Some(json!({ "email": format!("{}@example.com", username), "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(response.status(), 200, "signin for {}", username);
    let cookie = session_cookie_of(&response).expect("signin sets cookie");

    Session { id, cookie }
}

pub fn listing_body() -> Value {
    json!({
        "name": "Bright corner apartment",
        "description": "Two bedrooms with a view of the river",
        "address": "12 River Road",
        "regularPrice": 1500,
        "discountPrice": 1350,
        "bathrooms": 1,
        "bedrooms": 2,
        "furnished": true,
        "parking": false,
        "offer": true,
        "type": "rent",
        "imageUrls": [
            "https://img.example.com/a.jpg",
            "https://img.example.com/b.jpg",
            "https://img.example.com/c.jpg"
        ]
    })
}

pub async fn create_listing(app: &Router, session: &Session) -> Value {
    let response = send(app, "POST", "/api/listing/create", Some(&session.cookie), Some(listing_body())).await;
    assert_eq!(response.status(), 201);
    read_json(response).await["data"].clone()
}
