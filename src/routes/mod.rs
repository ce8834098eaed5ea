// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod pages;
pub mod session;

use crate::middleware::{edge_gate, require_canonical_path};
use crate::AppState;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Which of the two independent access checks are installed.
///
/// Production always runs both. Tests switch one off to show the other
/// denies on its own.
#[derive(Debug, Clone, Copy)]
pub struct RouterLayers {
    pub edge_gate: bool,
    pub route_guard: bool,
}

impl Default for RouterLayers {
    fn default() -> Self {
        Self {
            edge_gate: true,
            route_guard: true,
        }
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with(state, RouterLayers::default())
}

/// Build the router with a chosen set of access layers.
pub fn create_router_with(state: Arc<AppState>, layers: RouterLayers) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(session::routes());

    // Everything else is a page owned by the renderer.
    let router = if layers.route_guard {
        router.fallback(pages::guarded_page)
    } else {
        router.fallback(pages::forward_page)
    };

    let router = if layers.edge_gate {
        router.layer(middleware::from_fn_with_state(state.clone(), edge_gate))
    } else {
        tracing::warn!("Edge gate disabled");
        router
    };

    // Outside both access layers, so every decision sees the canonical path.
    let router = router.layer(middleware::from_fn(require_canonical_path));

    router
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
