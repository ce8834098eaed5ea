// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: sign-in, sign-up, logout, and account forms.
//!
//! These wrap the remote API so the token cookie is only ever written here.

use crate::error::{AppError, Result};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, Notification, NotificationCount,
    RegisterRequest, ResetPasswordRequest, UpdateNotificationsRequest, UpdateProfileRequest, User,
};
use crate::services::Account;
use crate::session::{AuthState, CookieTokenStore, Destination, Session, TokenStore};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{delete, get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use futures_util::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::{wrappers::WatchStream, StreamExt};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session/login", post(login))
        .route("/session/register", post(register))
        .route("/session/logout", post(logout))
        .route("/session/me", get(me))
        .route("/session/forgot-password", post(forgot_password))
        .route("/session/reset-password", post(reset_password))
        .route("/session/verify-email/{token}", get(verify_email))
        .route("/session/profile", put(update_profile))
        .route(
            "/session/notifications",
            get(list_notifications).put(update_notifications),
        )
        .route("/session/notifications/{id}", delete(delete_notification))
        .route("/session/notifications/{id}/read", put(mark_notification_read))
        .route("/session/notifications/count", get(notification_count))
        .route("/session/notifications/stream", get(notification_stream))
}

/// Signed in: the user (when the API returned or confirmed one) and where to go next.
#[derive(Serialize)]
pub struct SignedInResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub redirect: &'static str,
}

/// Signed out: where to go next.
#[derive(Serialize)]
pub struct SignedOutResponse {
    pub redirect: &'static str,
}

/// Confirmation message with an optional follow-up navigation.
#[derive(Serialize)]
pub struct NoticeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl NoticeResponse {
    fn new(message: MessageResponse, destination: Option<Destination>) -> Self {
        Self {
            message: message.message,
            redirect: destination.map(Destination::path),
        }
    }
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SignedInResponse>)> {
    let store = CookieTokenStore::new(jar);
    let (user, destination) = Account::new(&state.api, &store).login(&form).await?;

    Ok((
        store.jar(),
        Json(SignedInResponse {
            user,
            redirect: destination.path(),
        }),
    ))
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<SignedInResponse>)> {
    let store = CookieTokenStore::new(jar);
    let (user, destination) = Account::new(&state.api, &store).register(&form).await?;

    Ok((
        store.jar(),
        Json(SignedInResponse {
            user,
            redirect: destination.path(),
        }),
    ))
}

/// Delete the token cookie. Calling it without a session is fine.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<SignedOutResponse>) {
    let store = Arc::new(CookieTokenStore::new(jar));
    let session = Session::mount(state.api.clone(), store.clone());
    let destination = session.verifier().logout();
    tracing::debug!(to = destination.path(), "Session ended");

    (
        store.jar(),
        Json(SignedOutResponse {
            redirect: destination.path(),
        }),
    )
}

/// Current user, re-verified on every call.
async fn me(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let store = Arc::new(CookieTokenStore::new(jar));
    let session = Session::mount(state.api.clone(), store.clone());

    match session.verifier().resolve().await {
        AuthState::Authenticated(user) => (store.jar(), Json(user)).into_response(),
        AuthState::Anonymous | AuthState::Loading => {
            (store.jar(), AppError::Unauthorized).into_response()
        }
    }
}

async fn forgot_password(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<ForgotPasswordRequest>,
) -> Result<Json<NoticeResponse>> {
    let store = CookieTokenStore::new(jar);
    let message = Account::new(&state.api, &store)
        .forgot_password(&form)
        .await?;
    Ok(Json(NoticeResponse::new(message, None)))
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<ResetPasswordRequest>,
) -> Result<Json<NoticeResponse>> {
    let store = CookieTokenStore::new(jar);
    let (message, destination) = Account::new(&state.api, &store)
        .reset_password(&form)
        .await?;
    Ok(Json(NoticeResponse::new(message, Some(destination))))
}

async fn verify_email(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(token): Path<String>,
) -> Result<Json<NoticeResponse>> {
    let store = CookieTokenStore::new(jar);
    let (message, destination) = Account::new(&state.api, &store)
        .verify_email(&token)
        .await?;
    Ok(Json(NoticeResponse::new(message, Some(destination))))
}

/// Update the profile. The client reloads afterwards to re-fetch the user.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<UpdateProfileRequest>,
) -> Result<StatusCode> {
    let store = CookieTokenStore::new(jar);
    Account::new(&state.api, &store).save_profile(&form).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_notifications(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<UpdateNotificationsRequest>,
) -> Result<StatusCode> {
    let store = CookieTokenStore::new(jar);
    Account::new(&state.api, &store)
        .set_email_notifications(form.email_notifications)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn notification_count(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<NotificationCount>> {
    let store = CookieTokenStore::new(jar);
    let count = Account::new(&state.api, &store).notification_count().await?;
    Ok(Json(NotificationCount { count }))
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Json<Vec<Notification>>> {
    let store = CookieTokenStore::new(jar);
    let notifications = Account::new(&state.api, &store).notifications().await?;
    Ok(Json(notifications))
}

async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let store = CookieTokenStore::new(jar);
    Account::new(&state.api, &store)
        .mark_notification_read(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_notification(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let store = CookieTokenStore::new(jar);
    Account::new(&state.api, &store)
        .delete_notification(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Live notification count as server-sent events.
///
/// The stream owns the poller, so a client disconnect stops polling.
async fn notification_stream(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    let store = Arc::new(CookieTokenStore::new(jar));
    if store.get_token().is_none() {
        return Err(AppError::Unauthorized);
    }

    let session = Session::mount(state.api.clone(), store);
    let poller = session.watch_notifications(state.config.notification_poll);
    tracing::debug!(period = ?state.config.notification_poll, "Notification stream opened");

    let events = WatchStream::new(poller.subscribe()).map(move |count| {
        let _owner = &poller;
        Ok::<_, Infallible>(
            Event::default()
                .event("notifications")
                .data(count.to_string()),
        )
    });

    let keepalive = KeepAlive::new()
        .interval(Duration::from_secs(15))
        .text("keep-alive");

    Ok(Sse::new(events).keep_alive(keepalive))
}
