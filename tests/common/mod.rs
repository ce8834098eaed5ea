// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use study_gate::config::Config;
use study_gate::middleware::token::create_token;
use study_gate::models::Role;
use study_gate::routes::{create_router_with, RouterLayers};
use study_gate::AppState;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Body served by the fake page renderer.
#[allow(dead_code)]
pub const PAGE_BODY: &str = "rendered page";

/// A router wired to a fake remote API and a fake page renderer.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub api: MockServer,
    pub pages: MockServer,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    /// Signing secret the gate verifies admin tokens with.
    pub fn secret(&self) -> &[u8] {
        &self.state.config.token_signing_secret
    }

    pub fn token(&self, role: Role) -> String {
        create_token("u1", role, self.secret(), 3600).expect("Failed to sign token")
    }

    pub async fn page_requests(&self) -> Vec<wiremock::Request> {
        self.pages.received_requests().await.unwrap_or_default()
    }

    pub async fn api_requests(&self) -> Vec<wiremock::Request> {
        self.api.received_requests().await.unwrap_or_default()
    }
}

/// Create a test app with both access layers installed.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    create_test_app_with(RouterLayers::default()).await
}

/// Create a test app with a chosen set of access layers.
#[allow(dead_code)]
pub async fn create_test_app_with(layers: RouterLayers) -> TestApp {
    let api = MockServer::start().await;
    let pages = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_BODY))
        .mount(&pages)
        .await;

    let config = Config {
        api_base_url: api.uri(),
        page_origin: pages.uri(),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(config));

    TestApp {
        router: create_router_with(state.clone(), layers),
        api,
        pages,
        state,
    }
}

/// User record as returned by `GET /auth/verify`.
#[allow(dead_code)]
pub fn user_json(role: &str, first_name: &str) -> Value {
    json!({
        "_id": "u1",
        "firstName": first_name,
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "role": role,
        "plan": "free",
        "tokens": 5,
        "createdAt": "2025-01-01T00:00:00Z",
        "updatedAt": "2025-01-01T00:00:00Z"
    })
}

/// Make the remote verify endpoint accept any token as a user with `role`.
#[allow(dead_code)]
pub async fn mount_verify(api: &MockServer, role: &str) {
    Mock::given(method("GET"))
        .and(path("/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(role, "Ada")))
        .mount(api)
        .await;
}

/// GET `uri` with an optional session cookie.
#[allow(dead_code)]
pub fn page_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// JSON request with an optional session cookie.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("token={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
