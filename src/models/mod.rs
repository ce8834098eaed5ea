// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models exchanged with the remote API.

pub mod auth;
pub mod notification;
pub mod user;

pub use auth::{
    AuthSession, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UpdateNotificationsRequest, UpdateProfileRequest,
};
pub use notification::{Notification, NotificationCount};
pub use user::{Role, User};
