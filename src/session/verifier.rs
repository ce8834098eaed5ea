// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth Verifier: resolves the stored token into the current user.
//!
//! A verifier lives for one page load. It starts in [`AuthState::Loading`],
//! verifies the token at most once, and ends `Authenticated` or `Anonymous`.
//! A failed verification clears the token so an anonymous state never sits
//! next to a stale cookie.

use crate::models::User;
use crate::services::ApiClient;
use crate::session::policy::{Destination, Identity};
use crate::session::token_store::TokenStore;
use std::sync::Arc;
use tokio::sync::{watch, OnceCell};

/// Tri-state of the session for one page load.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Anonymous,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Identity as seen by the authorization policy.
    pub fn identity(&self) -> Identity {
        match self {
            AuthState::Loading => Identity::Pending,
            AuthState::Authenticated(user) => Identity::Authenticated {
                role: Some(user.role),
            },
            AuthState::Anonymous => Identity::Anonymous,
        }
    }
}

pub struct AuthVerifier {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    verified: OnceCell<()>,
}

impl AuthVerifier {
    /// Mount a verifier in the `Loading` state. Nothing is sent until
    /// [`AuthVerifier::resolve`] is awaited.
    pub fn mount(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            api,
            store,
            state,
            verified: OnceCell::new(),
        }
    }

    /// Run verification (once) and return the resolved state.
    ///
    /// Concurrent callers wait on the same in-flight verification.
    pub async fn resolve(&self) -> AuthState {
        self.verified.get_or_init(|| self.verify()).await;
        self.state()
    }

    async fn verify(&self) {
        let Some(token) = self.store.get_token() else {
            tracing::debug!("No session token, anonymous");
            self.settle(AuthState::Anonymous);
            return;
        };

        match self.api.verify_session(&token).await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, role = ?user.role, "Session verified");
                self.settle(AuthState::Authenticated(user));
            }
            Err(err) => {
                tracing::info!(kind = ?err.kind, error = %err, "Session verification failed, clearing token");
                self.store.set_token(None);
                self.settle(AuthState::Anonymous);
            }
        }
    }

    /// Leave `Loading`. A logout that raced ahead of verification wins.
    fn settle(&self, resolved: AuthState) {
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = resolved;
                true
            } else {
                false
            }
        });
    }

    /// Clear the token and drop to anonymous. Safe to call repeatedly.
    ///
    /// Returns where the caller should navigate.
    pub fn logout(&self) -> Destination {
        self.store.set_token(None);
        self.state.send_if_modified(|state| {
            if *state == AuthState::Anonymous {
                false
            } else {
                *state = AuthState::Anonymous;
                true
            }
        });
        tracing::debug!("Logged out");
        Destination::SignIn
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Token for collaborators attaching it to their own requests.
    pub fn token(&self) -> Option<String> {
        self.store.get_token()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}
