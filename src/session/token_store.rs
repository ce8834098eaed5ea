// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token storage.
//!
//! The token lives in a single cookie named `token` with path `/`. Only a
//! [`TokenStore`] writes it; every other collaborator reads it through the
//! Auth Verifier.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::sync::{Mutex, PoisonError, RwLock};
use time::OffsetDateTime;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Read/write access to the session token. Absence is a normal state.
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<String>;

    /// Store `Some(token)`, or delete the token with `None`.
    fn set_token(&self, token: Option<&str>);
}

/// Cookie carrying a freshly issued token. No expiry: lasts for the browser session.
pub fn token_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .build()
}

/// Same cookie with an already-expired date, which makes the browser drop it.
pub fn expired_token_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Read the token from a request cookie jar.
pub fn read_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Token store backed by the cookies of one HTTP exchange.
///
/// Writes are recorded in the jar; hand [`CookieTokenStore::jar`] to the
/// response to emit the matching `Set-Cookie` headers.
#[derive(Debug)]
pub struct CookieTokenStore {
    jar: Mutex<CookieJar>,
}

impl CookieTokenStore {
    pub fn new(jar: CookieJar) -> Self {
        Self {
            jar: Mutex::new(jar),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(CookieJar::from_headers(headers))
    }

    /// Snapshot of the jar including pending changes.
    pub fn jar(&self) -> CookieJar {
        self.jar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for CookieTokenStore {
    fn get_token(&self) -> Option<String> {
        read_token(&self.jar.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn set_token(&self, token: Option<&str>) {
        let mut jar = self.jar.lock().unwrap_or_else(PoisonError::into_inner);
        let cookie = match token {
            Some(token) => token_cookie(token),
            None => expired_token_cookie(),
        };
        *jar = jar.clone().add(cookie);
    }
}

/// In-process token store for headless clients.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: RwLock::new(token.map(str::to_owned)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: Option<&str>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) =
            token.filter(|t| !t.is_empty()).map(str::to_owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use axum::response::IntoResponse;

    fn jar_with(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie_header.parse().unwrap());
        CookieJar::from_headers(&headers)
    }

    fn set_cookies(jar: CookieJar) -> Vec<String> {
        let response = (jar, "").into_response();
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_get_token_from_cookie_header() {
        let store = CookieTokenStore::new(jar_with("theme=dark; token=abc.def.ghi"));
        assert_eq!(store.get_token().as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_or_empty_token_is_none() {
        assert_eq!(CookieTokenStore::new(jar_with("theme=dark")).get_token(), None);
        assert_eq!(CookieTokenStore::new(jar_with("token=")).get_token(), None);
    }

    #[test]
    fn test_set_token_writes_session_cookie() {
        let store = CookieTokenStore::new(CookieJar::new());
        store.set_token(Some("fresh"));

        assert_eq!(store.get_token().as_deref(), Some("fresh"));
        let cookies = set_cookies(store.jar());
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("token=fresh"));
        assert!(cookies[0].contains("Path=/"));
        assert!(!cookies[0].contains("Expires"));
    }

    #[test]
    fn test_clear_token_writes_expired_cookie() {
        let store = CookieTokenStore::new(jar_with("token=stale"));
        store.set_token(None);

        assert_eq!(store.get_token(), None);
        let cookies = set_cookies(store.jar());
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("token=;"));
        assert!(cookies[0].contains("Path=/"));
        assert!(cookies[0].contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new(Some("t1"));
        assert_eq!(store.get_token().as_deref(), Some("t1"));
        store.set_token(None);
        assert_eq!(store.get_token(), None);
        store.set_token(None);
        assert_eq!(store.get_token(), None);
    }
}
