// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization decision shared by the edge gate and the route guard.
//!
//! Both layers describe what they know about the caller as an [`Identity`]
//! and ask [`authorize`] what to do. Keeping one decision function means the
//! two layers cannot drift apart.

use crate::models::Role;

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const SIGN_UP_PATH: &str = "/sign-up";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_PREFIX: &str = "/admin";

/// Path prefixes that require a session.
pub const PROTECTED_PREFIXES: [&str; 8] = [
    "/dashboard",
    "/upload",
    "/documents",
    "/history",
    "/profile",
    "/settings",
    "/help",
    ADMIN_PREFIX,
];

/// Pages only useful to visitors without a session.
pub const AUTH_PAGES: [&str; 2] = [SIGN_IN_PATH, SIGN_UP_PATH];

/// Where a denied caller is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    SignIn,
    Dashboard,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Destination::SignIn => SIGN_IN_PATH,
            Destination::Dashboard => DASHBOARD_PATH,
        }
    }
}

/// What a path requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Sign-in and sign-up: a caller with a session is sent to the dashboard.
    GuestOnly,
    Authenticated,
    Role(Role),
}

impl Access {
    /// Whether a session must be resolved before this path can be served.
    pub fn needs_session(self) -> bool {
        matches!(self, Access::Authenticated | Access::Role(_))
    }
}

/// What a layer knows about the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// Still being verified.
    Pending,
    Anonymous,
    /// `role` is `None` when the layer saw a token but did not decode it.
    Authenticated { role: Option<Role> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Pending,
    Allow,
    Redirect(Destination),
}

/// `path` equals `prefix` or continues it with a new segment.
pub fn has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Sign-in and sign-up match exactly; `/sign-in/anything` is an ordinary page.
pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGES.contains(&path)
}

/// Access requirement for a request path.
pub fn required_access(path: &str) -> Access {
    if has_prefix(path, ADMIN_PREFIX) {
        Access::Role(Role::Admin)
    } else if is_auth_page(path) {
        Access::GuestOnly
    } else if PROTECTED_PREFIXES.iter().any(|prefix| has_prefix(path, prefix)) {
        Access::Authenticated
    } else {
        Access::Public
    }
}

/// Decide whether `identity` may see a page requiring `access`.
pub fn authorize(identity: &Identity, access: &Access) -> AccessDecision {
    match (access, identity) {
        (Access::Public, _) => AccessDecision::Allow,
        (_, Identity::Pending) => AccessDecision::Pending,
        (Access::GuestOnly, Identity::Anonymous) => AccessDecision::Allow,
        (Access::GuestOnly, Identity::Authenticated { .. }) => {
            AccessDecision::Redirect(Destination::Dashboard)
        }
        (_, Identity::Anonymous) => AccessDecision::Redirect(Destination::SignIn),
        (Access::Authenticated, Identity::Authenticated { .. }) => AccessDecision::Allow,
        (Access::Role(required), Identity::Authenticated { role: Some(role) })
            if role == required =>
        {
            AccessDecision::Allow
        }
        (Access::Role(_), Identity::Authenticated { .. }) => {
            AccessDecision::Redirect(Destination::Dashboard)
        }
    }
}
