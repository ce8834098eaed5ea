// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edge gate tests.
//!
//! The route guard is switched off here so every redirect observed comes
//! from the gate alone, before the page renderer is contacted.

use axum::http::StatusCode;
use study_gate::middleware::token::create_token;
use study_gate::models::Role;
use study_gate::routes::RouterLayers;
use tower::ServiceExt;

mod common;

fn gate_only() -> RouterLayers {
    RouterLayers {
        edge_gate: true,
        route_guard: false,
    }
}

#[tokio::test]
async fn test_no_token_on_protected_path_redirects_to_sign_in() {
    let app = common::create_test_app_with(gate_only()).await;

    for uri in [
        "/dashboard",
        "/upload",
        "/documents/abc",
        "/history",
        "/profile",
        "/settings",
        "/help",
        "/admin/support",
    ] {
        let response = app
            .router
            .clone()
            .oneshot(common::page_request(uri, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        assert_eq!(common::location(&response).as_deref(), Some("/sign-in"), "{uri}");
    }

    assert!(app.page_requests().await.is_empty());
}

#[tokio::test]
async fn test_token_on_auth_page_redirects_to_dashboard() {
    let app = common::create_test_app_with(gate_only()).await;
    let token = app.token(Role::User);

    for uri in ["/sign-in", "/sign-up"] {
        let response = app
            .router
            .clone()
            .oneshot(common::page_request(uri, Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(common::location(&response).as_deref(), Some("/dashboard"));
    }
}

#[tokio::test]
async fn test_auth_page_without_token_is_served() {
    let app = common::create_test_app_with(gate_only()).await;

    let response = app
        .router
        .clone()
        .oneshot(common::page_request("/sign-in", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_text(response).await, common::PAGE_BODY);
}

#[tokio::test]
async fn test_public_path_is_not_gated() {
    let app = common::create_test_app_with(gate_only()).await;

    let response = app
        .router
        .clone()
        .oneshot(common::page_request("/pricing", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let forwarded = app.page_requests().await;
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].url.path(), "/pricing");
}

#[tokio::test]
async fn test_allowed_request_forwards_bearer_token() {
    let app = common::create_test_app_with(gate_only()).await;

    let response = app
        .router
        .clone()
        .oneshot(common::page_request("/history?page=2", Some("opaque-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let forwarded = app.page_requests().await;
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].url.path(), "/history");
    assert_eq!(forwarded[0].url.query(), Some("page=2"));
    assert_eq!(
        forwarded[0].headers.get("authorization").unwrap(),
        "Bearer opaque-token"
    );
}

#[tokio::test]
async fn test_admin_path_with_admin_token_is_allowed() {
    let app = common::create_test_app_with(gate_only()).await;
    let token = app.token(Role::Admin);

    let response = app
        .router
        .clone()
        .oneshot(common::page_request("/admin/support", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.page_requests().await.len(), 1);
}

#[tokio::test]
async fn test_admin_path_with_user_token_redirects_to_dashboard() {
    let app = common::create_test_app_with(gate_only()).await;
    let token = app.token(Role::User);

    let response = app
        .router
        .clone()
        .oneshot(common::page_request("/admin/support", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(common::location(&response).as_deref(), Some("/dashboard"));
    assert!(app.page_requests().await.is_empty());
}

#[tokio::test]
async fn test_admin_path_with_unverifiable_token_redirects_to_sign_in() {
    let app = common::create_test_app_with(gate_only()).await;
    let forged = create_token("u1", Role::Admin, b"not_the_server_secret", 3600).unwrap();

    for token in [forged.as_str(), "garbage"] {
        let response = app
            .router
            .clone()
            .oneshot(common::page_request("/admin/support/7", Some(token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(common::location(&response).as_deref(), Some("/sign-in"));
    }

    assert!(app.page_requests().await.is_empty());
}

#[tokio::test]
async fn test_gate_never_calls_remote_api() {
    let app = common::create_test_app_with(gate_only()).await;
    let token = app.token(Role::Admin);

    app.router
        .clone()
        .oneshot(common::page_request("/admin/support", Some(&token)))
        .await
        .unwrap();
    app.router
        .clone()
        .oneshot(common::page_request("/dashboard", Some(&token)))
        .await
        .unwrap();

    assert!(app.api_requests().await.is_empty());
}
