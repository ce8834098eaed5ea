// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gating: token storage, verification, and route protection.

pub mod guard;
pub mod notifications;
pub mod policy;
pub mod token_store;
pub mod verifier;

pub use guard::{GuardView, RouteGuard};
pub use notifications::NotificationPoller;
pub use policy::{authorize, required_access, Access, AccessDecision, Destination, Identity};
pub use token_store::{CookieTokenStore, MemoryTokenStore, TokenStore};
pub use verifier::{AuthState, AuthVerifier};

use crate::services::ApiClient;
use std::sync::Arc;
use std::time::Duration;

/// Session for one page load, passed explicitly to whatever needs it.
pub struct Session {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    verifier: AuthVerifier,
}

impl Session {
    pub fn mount(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let verifier = AuthVerifier::mount(api.clone(), store.clone());
        Self {
            api,
            store,
            verifier,
        }
    }

    pub fn verifier(&self) -> &AuthVerifier {
        &self.verifier
    }

    /// Guard a view requiring `access`.
    pub fn guard(&self, access: Access) -> RouteGuard {
        RouteGuard::new(self.verifier.subscribe(), access)
    }

    /// Start the notification counter for a guarded view. The poller stops
    /// when the returned handle is dropped.
    pub fn watch_notifications(&self, period: Duration) -> NotificationPoller {
        NotificationPoller::spawn(self.api.clone(), self.store.clone(), period)
    }
}
