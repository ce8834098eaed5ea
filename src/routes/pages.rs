// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page requests: guard, then forward to the renderer.

use crate::error::{AppError, Result};
use crate::middleware::GateToken;
use crate::session::{required_access, CookieTokenStore, GuardView, Session, TokenStore};
use crate::AppState;
use axum::{
    extract::{Request, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Resolve the session and run the route guard before serving a protected page.
///
/// Public and sign-in/sign-up pages are forwarded directly.
pub async fn guarded_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
) -> Result<Response> {
    let access = required_access(request.uri().path());
    if !access.needs_session() {
        return state.pages.forward(request, None).await;
    }

    let store = Arc::new(CookieTokenStore::new(jar));
    let session = Session::mount(state.api.clone(), store.clone());
    let mut guard = session.guard(access);

    session.verifier().resolve().await;
    let view = guard.settle().await;
    // Carries the deletion of a token the verifier rejected.
    let jar = store.jar();

    match view {
        GuardView::Render => {
            let token = store.get_token();
            let response = state.pages.forward(request, token.as_deref()).await?;
            Ok((jar, response).into_response())
        }
        GuardView::Redirect(destination) => {
            tracing::info!(
                path = %request.uri().path(),
                to = destination.path(),
                "Route guard redirect"
            );
            Ok((jar, Redirect::temporary(destination.path())).into_response())
        }
        GuardView::Placeholder | GuardView::Nothing => Err(AppError::Internal(anyhow::anyhow!(
            "route guard did not settle"
        ))),
    }
}

/// Forward without a route guard, passing on the token the edge gate let through.
pub async fn forward_page(State(state): State<Arc<AppState>>, request: Request) -> Result<Response> {
    let token = request
        .extensions()
        .get::<GateToken>()
        .map(|GateToken(token)| token.clone());
    state.pages.forward(request, token.as_deref()).await
}
