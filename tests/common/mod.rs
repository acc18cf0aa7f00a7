// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, Method, StatusCode};
use serde_json::{json, Value};

use estate_api::config::AppConfig;
use estate_api::database::MemoryStore;
use estate_api::{app, AppState};

pub const PASSWORD: &str = "integration-password";

pub struct TestServer {
    pub base_url: String,
}

impl TestServer {
    /// Serve the app over a fresh in-memory store on an unused port. The server
    /// task lives on the calling test's runtime and stops with it.
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.security.jwt_secret = "integration-secret-integration-secret".to_string();
        config.api.enable_request_logging = false;

        let state = AppState::new(config, Arc::new(MemoryStore::new()))?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self { base_url };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn client(&self) -> Client {
        Client {
            base_url: self.base_url.clone(),
            http: reqwest::Client::new(),
            cookie: None,
            user_id: None,
        }
    }
}

/// HTTP client that carries the `access_token` cookie by hand, the way a
/// browser would.
pub struct Client {
    pub base_url: String,
    http: reqwest::Client,
    pub cookie: Option<String>,
    pub user_id: Option<String>,
}

pub struct Reply {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl Client {
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply> {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(cookie) = &self.cookie {
            req = req.header(header::COOKIE, cookie);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = res.json::<Value>().await.context("response body is not JSON")?;

        Ok(Reply { status, set_cookie, body })
    }

    pub async fn get(&self, path: &str) -> Result<Reply> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Reply> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Reply> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Reply> {
        self.request(Method::DELETE, path, None).await
    }

    /// Register `username` and sign in, keeping the session cookie.
    pub async fn sign_up_and_in(&mut self, username: &str) -> Result<String> {
        let email = format!("{}@example.com", username);

        let reply = self
            .post(
                "/api/auth/signup",
                json!({"username": username, "email": email, "password": PASSWORD}),
            )
            .await?;
        anyhow::ensure!(reply.status == StatusCode::CREATED, "signup failed: {}", reply.body);

        let reply = self
            .post("/api/auth/signin", json!({"email": email, "password": PASSWORD}))
            .await?;
        anyhow::ensure!(reply.status == StatusCode::OK, "signin failed: {}", reply.body);

        let cookie = reply
            .set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .context("signin did not set a cookie")?;
        self.cookie = Some(cookie.to_string());

        let id = reply.body["data"]["id"].as_str().context("signin returned no id")?.to_string();
        self.user_id = Some(id.clone());
        Ok(id)
    }
}

pub fn listing_payload(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Recently renovated, lots of light",
        "address": "7 Harbour Street",
        "regularPrice": 320000,
        "discountPrice": 0,
        "bathrooms": 2,
        "bedrooms": 3,
        "furnished": false,
        "parking": true,
        "offer": false,
        "type": "sell",
        "imageUrls": ["https://img.example.com/front.jpg", "https://img.example.com/kitchen.jpg"]
    })
}
