// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed session token (JWT) verification.
//!
//! Tokens are issued by the remote API and signed with HS256 using a secret
//! shared with this server only.

use crate::models::Role;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Role claim; absent means not an admin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid or expired token: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Verify the signature and expiry of `token` and decode its claims.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);
    Ok(decode::<Claims>(token, &key, &validation)?.claims)
}

/// Sign a token the way the remote API does. Used by tooling and tests.
pub fn create_token(
    id: &str,
    role: Role,
    secret: &[u8],
    ttl_secs: usize,
) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        id: Some(id.to_string()),
        role: Some(role),
        iat: now,
        exp: now + ttl_secs,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}
