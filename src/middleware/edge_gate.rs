// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edge gate: per-request cookie check that runs before any page code.
//!
//! Stateless. Every request is judged from its own cookie; admin paths
//! re-verify the token signature each time.

use crate::middleware::token::verify_token;
use crate::session::policy::{
    authorize, required_access, Access, AccessDecision, Destination, Identity, PROTECTED_PREFIXES,
};
use crate::session::token_store::read_token;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Raw session token of a request that passed the gate.
#[derive(Debug, Clone)]
pub struct GateToken(pub String);

/// Whether the gate's matcher covers `path`.
pub fn is_gated_path(path: &str) -> bool {
    use crate::session::policy::{has_prefix, is_auth_page};

    is_auth_page(path) || PROTECTED_PREFIXES.iter().any(|prefix| has_prefix(path, prefix))
}

/// Identity as far as the gate can tell for a path requiring `access`.
///
/// Only role-restricted paths pay for signature verification. Elsewhere the
/// presence of a cookie is enough at this layer.
pub fn gate_identity(token: Option<&str>, access: &Access, secret: &[u8]) -> Identity {
    let Some(token) = token else {
        return Identity::Anonymous;
    };

    if !matches!(access, Access::Role(_)) {
        return Identity::Authenticated { role: None };
    }

    match verify_token(token, secret) {
        Ok(claims) => Identity::Authenticated { role: claims.role },
        Err(err) => {
            tracing::info!(error = %err, "Edge gate rejected token");
            Identity::Anonymous
        }
    }
}

/// Gate decision for a request, or `None` when the path is not gated.
pub fn evaluate(path: &str, token: Option<&str>, secret: &[u8]) -> Option<AccessDecision> {
    if !is_gated_path(path) {
        return None;
    }
    let access = required_access(path);
    let identity = gate_identity(token, &access, secret);
    Some(authorize(&identity, &access))
}

/// Middleware enforcing the gate on matched paths.
pub async fn edge_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = read_token(&jar);
    let path = request.uri().path();

    let decision = evaluate(path, token.as_deref(), &state.config.token_signing_secret);

    match decision {
        None | Some(AccessDecision::Allow) => {}
        Some(AccessDecision::Redirect(destination)) => {
            tracing::info!(path = %path, to = destination.path(), "Edge gate redirect");
            return Redirect::temporary(destination.path()).into_response();
        }
        Some(AccessDecision::Pending) => {
            // The gate never waits on anything; treat as unauthenticated.
            return Redirect::temporary(Destination::SignIn.path()).into_response();
        }
    }

    if decision.is_some() {
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    request.headers_mut().insert(header::AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("Session token is not a valid header value, not forwarded");
                }
            }
            request.extensions_mut().insert(GateToken(token));
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::token::create_token;
    use crate::models::Role;

    const SECRET: &[u8] = b"unit_test_secret_32_bytes_long!!";

    #[test]
    fn test_matcher() {
        for path in [
            "/dashboard",
            "/upload",
            "/documents/1",
            "/history",
            "/profile",
            "/settings/billing",
            "/help",
            "/admin/support",
            "/sign-in",
            "/sign-up",
        ] {
            assert!(is_gated_path(path), "{path} should be gated");
        }
        for path in [
            "/",
            "/pricing",
            "/terms",
            "/support",
            "/reset-password/abc",
            "/sign-in/extra",
            "/sign-upgrade",
        ] {
            assert!(!is_gated_path(path), "{path} should not be gated");
        }
    }

    #[test]
    fn test_no_token_redirects_to_sign_in() {
        assert_eq!(
            evaluate("/dashboard", None, SECRET),
            Some(AccessDecision::Redirect(Destination::SignIn))
        );
        assert_eq!(evaluate("/sign-in", None, SECRET), Some(AccessDecision::Allow));
        assert_eq!(evaluate("/", None, SECRET), None);
    }

    #[test]
    fn test_token_on_auth_page_redirects_to_dashboard() {
        assert_eq!(
            evaluate("/sign-up", Some("anything"), SECRET),
            Some(AccessDecision::Redirect(Destination::Dashboard))
        );
    }

    #[test]
    fn test_admin_requires_verified_admin_claim() {
        let admin = create_token("a", Role::Admin, SECRET, 60).unwrap();
        let user = create_token("u", Role::User, SECRET, 60).unwrap();
        let forged = create_token("a", Role::Admin, b"attacker_secret", 60).unwrap();

        assert_eq!(
            evaluate("/admin/support", Some(&admin), SECRET),
            Some(AccessDecision::Allow)
        );
        assert_eq!(
            evaluate("/admin/support", Some(&user), SECRET),
            Some(AccessDecision::Redirect(Destination::Dashboard))
        );
        assert_eq!(
            evaluate("/admin/support", Some(&forged), SECRET),
            Some(AccessDecision::Redirect(Destination::SignIn))
        );
        assert_eq!(
            evaluate("/admin", Some("garbage"), SECRET),
            Some(AccessDecision::Redirect(Destination::SignIn))
        );
    }

    #[test]
    fn test_non_admin_paths_do_not_decode() {
        // An unverifiable token still passes presence-only paths.
        assert_eq!(
            evaluate("/dashboard", Some("opaque"), SECRET),
            Some(AccessDecision::Allow)
        );
    }
}
