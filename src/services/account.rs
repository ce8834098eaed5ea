// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account form flows.
//!
//! Each flow validates locally first; a validation failure returns before any
//! request is sent. Only successful login and registration write the token.

use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::models::{
    AuthSession, ForgotPasswordRequest, LoginRequest, MessageResponse, Notification,
    RegisterRequest, ResetPasswordRequest, UpdateNotificationsRequest, UpdateProfileRequest, User,
};
use crate::services::ApiClient;
use crate::session::policy::Destination;
use crate::session::TokenStore;

/// Account operations bound to one token store.
pub struct Account<'a> {
    api: &'a ApiClient,
    store: &'a dyn TokenStore,
}

impl<'a> Account<'a> {
    pub fn new(api: &'a ApiClient, store: &'a dyn TokenStore) -> Self {
        Self { api, store }
    }

    /// Sign in. On success the token is stored and the caller goes to the dashboard.
    pub async fn login(&self, form: &LoginRequest) -> ApiResult<(Option<User>, Destination)> {
        form.check()?;
        let session = self.api.login(form).await?;
        let user = self.start_session(session).await;
        tracing::info!(user_id = ?user.as_ref().map(|u| &u.id), "Signed in");
        Ok((user, Destination::Dashboard))
    }

    /// Create an account and sign in with the returned token.
    pub async fn register(&self, form: &RegisterRequest) -> ApiResult<(Option<User>, Destination)> {
        form.check()?;
        let session = self.api.register(form).await?;
        let user = self.start_session(session).await;
        tracing::info!(user_id = ?user.as_ref().map(|u| &u.id), "Registered");
        Ok((user, Destination::Dashboard))
    }

    /// Store the issued token. A response without a user record is
    /// completed through the verify endpoint; failing that, the user stays
    /// unknown until the next page load verifies the session.
    async fn start_session(&self, session: AuthSession) -> Option<User> {
        self.store.set_token(Some(&session.token));
        match session.user {
            Some(user) => Some(user),
            None => match self.api.verify_session(&session.token).await {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "Could not load user for new session");
                    None
                }
            },
        }
    }

    pub async fn forgot_password(&self, form: &ForgotPasswordRequest) -> ApiResult<MessageResponse> {
        form.check()?;
        self.api.forgot_password(form).await
    }

    /// Reset the password. The caller is sent to sign in afterwards.
    pub async fn reset_password(
        &self,
        form: &ResetPasswordRequest,
    ) -> ApiResult<(MessageResponse, Destination)> {
        form.check()?;
        let message = self.api.reset_password(form).await?;
        Ok((message, Destination::SignIn))
    }

    pub async fn verify_email(&self, email_token: &str) -> ApiResult<(MessageResponse, Destination)> {
        if email_token.is_empty() {
            return Err(ApiError::validation("Verification link is invalid"));
        }
        let message = self.api.verify_email(email_token).await?;
        Ok((message, Destination::SignIn))
    }

    /// Save profile changes. The caller reloads to pick up the new record.
    pub async fn save_profile(&self, form: &UpdateProfileRequest) -> ApiResult<()> {
        form.check()?;
        let token = self.require_token()?;
        self.api.update_profile(&token, form).await
    }

    pub async fn set_email_notifications(&self, enabled: bool) -> ApiResult<()> {
        let token = self.require_token()?;
        let form = UpdateNotificationsRequest {
            email_notifications: enabled,
        };
        self.api.update_notifications(&token, &form).await
    }

    pub async fn notification_count(&self) -> ApiResult<u64> {
        let token = self.require_token()?;
        self.api.notification_count(&token).await
    }

    pub async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        let token = self.require_token()?;
        self.api.list_notifications(&token).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> ApiResult<()> {
        let token = self.require_token()?;
        self.api.mark_notification_read(&token, id).await
    }

    pub async fn delete_notification(&self, id: &str) -> ApiResult<()> {
        let token = self.require_token()?;
        self.api.delete_notification(&token, id).await
    }

    fn require_token(&self) -> ApiResult<String> {
        self.store
            .get_token()
            .ok_or_else(|| ApiError::new(ErrorKind::Authentication, "Authentication required"))
    }
}
