// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route Guard: decides what a protected view shows for the current session.

use crate::session::policy::{authorize, Access, AccessDecision, Destination, Identity};
use crate::session::verifier::AuthState;
use tokio::sync::watch;

/// Output of the guard for the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// Session still loading: show a spinner, decide nothing yet.
    Placeholder,
    /// Render the protected content.
    Render,
    /// Navigate away and render nothing.
    Redirect(Destination),
    /// A redirect for this state was already issued; render nothing.
    Nothing,
}

/// Wraps a protected view and watches the verifier's state.
#[derive(Debug)]
pub struct RouteGuard {
    state: watch::Receiver<AuthState>,
    access: Access,
    redirected_for: Option<Identity>,
}

impl RouteGuard {
    pub fn new(state: watch::Receiver<AuthState>, access: Access) -> Self {
        Self {
            state,
            access,
            redirected_for: None,
        }
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Current view. A redirect is emitted once per resolved state.
    pub fn view(&mut self) -> GuardView {
        let identity = self.state.borrow_and_update().identity();

        match authorize(&identity, &self.access) {
            AccessDecision::Pending => GuardView::Placeholder,
            AccessDecision::Allow => {
                self.redirected_for = None;
                GuardView::Render
            }
            AccessDecision::Redirect(_) if self.redirected_for == Some(identity) => {
                GuardView::Nothing
            }
            AccessDecision::Redirect(destination) => {
                tracing::debug!(?identity, to = destination.path(), "Route guard redirect");
                self.redirected_for = Some(identity);
                GuardView::Redirect(destination)
            }
        }
    }

    /// Wait until the session leaves `Loading`, then return the view.
    pub async fn settle(&mut self) -> GuardView {
        // A dropped verifier leaves the last published state in place.
        let _ = self.state.wait_for(|state| !state.is_loading()).await;
        self.view()
    }
}
