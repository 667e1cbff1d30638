#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use favorites_api::auth::{generate_jwt, Claims};
use favorites_api::config::AppConfig;
use favorites_api::database::{MemoryStore, Store};
use favorites_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// Seeded user ids
pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

/// A server on a free local port over its own in-memory store
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    client: reqwest::Client,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Serve the router over an in-memory store seeded with alice (1) and bob (2)
    pub async fn new() -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        store.insert_user("alice", "alice@example.com", "hash").await?;
        store.insert_user("bob", "bob@example.com", "hash").await?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = SECRET.to_string();
        config.api.enable_request_logging = false;

        let shared: Arc<dyn Store> = store.clone();
        let router = app(AppState::new(shared, config));

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            client: reqwest::Client::new(),
        })
    }

    pub fn token(user_id: i64) -> String {
        let claims = Claims::new(user_id, 1).expect("failed to build test claims");
        generate_jwt(&claims, SECRET).expect("failed to sign test token")
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> Result<TestResponse> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, uri));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.header(reqwest::header::CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, token, Some(body.to_string())).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, token, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Create a favorite as its owner and return the new id
    pub async fn create_favorite(&self, title: &str, owner: i64) -> Result<i64> {
        let token = Self::token(owner);
        let res = self
            .post_json("/favorites", Some(&token), serde_json::json!({ "title": title, "user_id": owner }))
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {} {}", res.status, res.body);
        res.body["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing id in {}", res.body))
    }
}
