//! Authentication form payloads and remote responses.
//!
//! Each form carries a `check()` that runs the local validation performed
//! before any request is sent. A failed check never reaches the network.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::models::User;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
pub const CREDENTIALS_REQUIRED: &str = "Email and password are required";
pub const NAMES_REQUIRED: &str = "First name and last name cannot be empty";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Successful login or registration.
///
/// Only the token is required. The user record is `None` when the API
/// answers with just a token (plus e.g. a `message`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(flatten)]
    pub user: Option<User>,
}

/// `{ message }` body returned by password and email flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::validation(CREDENTIALS_REQUIRED));
        }
        self.validate().map_err(into_api_error)
    }
}

/// Sign-up form. `confirm_password` is only checked locally.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.password != self.confirm_password {
            return Err(ApiError::validation(PASSWORDS_DO_NOT_MATCH));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(PASSWORD_TOO_SHORT));
        }
        self.validate().map_err(into_api_error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        self.validate().map_err(into_api_error)
    }
}

/// Reset form for the token mailed by the forgot-password flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.new_password != self.confirm_password {
            return Err(ApiError::validation(PASSWORDS_DO_NOT_MATCH));
        }
        if self.token.is_empty() {
            return Err(ApiError::validation("Reset link is invalid"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UpdateProfileRequest {
    pub fn check(&self) -> Result<(), ApiError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ApiError::validation(NAMES_REQUIRED));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationsRequest {
    pub email_notifications: bool,
}

/// Collapse validator output into the single message shown inline.
fn into_api_error(errors: ValidationErrors) -> ApiError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| INVALID_EMAIL.to_string());
    ApiError::validation(message)
}
