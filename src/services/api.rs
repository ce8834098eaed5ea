// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the remote study API.
//!
//! Handles:
//! - Login, registration, and session verification
//! - Password reset and email verification
//! - Profile and notification preference updates
//! - Notification listing and counters
//!
//! Every call returns [`ApiResult`]: either the decoded body or an
//! [`ApiError`] carrying the remote `{ error }` message (or a per-operation
//! fallback when the body has none).

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AuthSession, ForgotPasswordRequest, LoginRequest, MessageResponse, Notification,
    NotificationCount, RegisterRequest, ResetPasswordRequest, UpdateNotificationsRequest,
    UpdateProfileRequest, User,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote API client.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// `{ error }` body of a failed call.
#[derive(Deserialize)]
struct RemoteError {
    error: Option<String>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self::with_http(http, base_url)
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Authentication ──────────────────────────────────────────────────

    pub async fn login(&self, form: &LoginRequest) -> ApiResult<AuthSession> {
        let request = self.http.post(self.url("/auth/login")).json(form);
        self.send_json(request, "Login failed").await
    }

    pub async fn register(&self, form: &RegisterRequest) -> ApiResult<AuthSession> {
        let request = self.http.post(self.url("/auth/register")).json(form);
        self.send_json(request, "Registration failed").await
    }

    /// Exchange a session token for the current user record.
    pub async fn verify_session(&self, token: &str) -> ApiResult<User> {
        let request = self.http.get(self.url("/auth/verify")).bearer_auth(token);
        self.send_json(request, "Session verification failed").await
    }

    pub async fn forgot_password(&self, form: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
        let request = self.http.post(self.url("/auth/forgot-password")).json(form);
        self.send_json(request, "Failed to send reset email").await
    }

    pub async fn reset_password(&self, form: &ResetPasswordRequest) -> ApiResult<MessageResponse> {
        let request = self.http.post(self.url("/auth/reset-password")).json(form);
        self.send_json(request, "Failed to reset password").await
    }

    pub async fn verify_email(&self, email_token: &str) -> ApiResult<MessageResponse> {
        let path = format!("/auth/verify-email/{}", urlencoding::encode(email_token));
        let request = self.http.get(self.url(&path));
        self.send_json(request, "Verification failed").await
    }

    // ─── Account ─────────────────────────────────────────────────────────

    pub async fn update_profile(&self, token: &str, form: &UpdateProfileRequest) -> ApiResult<()> {
        let request = self
            .http
            .put(self.url("/auth/update-profile"))
            .bearer_auth(token)
            .json(form);
        self.send_empty(request, "Failed to update profile").await
    }

    pub async fn update_notifications(
        &self,
        token: &str,
        form: &UpdateNotificationsRequest,
    ) -> ApiResult<()> {
        let request = self
            .http
            .put(self.url("/auth/update-notifications"))
            .bearer_auth(token)
            .json(form);
        self.send_empty(request, "Failed to update notification preferences")
            .await
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub async fn notification_count(&self, token: &str) -> ApiResult<u64> {
        let request = self
            .http
            .get(self.url("/notifications/count"))
            .bearer_auth(token);
        let body: NotificationCount = self
            .send_json(request, "Failed to fetch notification count")
            .await?;
        Ok(body.count)
    }

    pub async fn list_notifications(&self, token: &str) -> ApiResult<Vec<Notification>> {
        let request = self.http.get(self.url("/notifications")).bearer_auth(token);
        self.send_json(request, "Failed to fetch notifications").await
    }

    pub async fn mark_notification_read(&self, token: &str, id: &str) -> ApiResult<()> {
        let path = format!("/notifications/{}/read", urlencoding::encode(id));
        let request = self.http.put(self.url(&path)).bearer_auth(token);
        self.send_empty(request, "Failed to mark notification as read")
            .await
    }

    pub async fn delete_notification(&self, token: &str, id: &str) -> ApiResult<()> {
        let path = format!("/notifications/{}", urlencoding::encode(id));
        let request = self.http.delete(self.url(&path)).bearer_auth(token);
        self.send_empty(request, "Failed to delete notification")
            .await
    }

    // ─── Plumbing ────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ApiResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Remote API unreachable");
            ApiError::network()
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let message = response
            .json::<RemoteError>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        tracing::debug!(status = status.as_u16(), error = %message, "Remote API call failed");
        Err(ApiError::from_status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = self.send(request, fallback).await?;
        response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Remote API returned an unreadable body");
            ApiError::network()
        })
    }

    async fn send_empty(&self, request: reqwest::RequestBuilder, fallback: &str) -> ApiResult<()> {
        self.send(request, fallback).await.map(|_| ())
    }
}
