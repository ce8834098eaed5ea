// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forwarding of allowed requests to the page renderer.

use crate::error::AppError;
use crate::middleware::canonical_path;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::Response,
};

/// Largest request body forwarded to the page origin.
const MAX_FORWARD_BODY: usize = 2 * 1024 * 1024;

/// Connection-scoped headers that must not be forwarded in either direction.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
    header::PROXY_AUTHORIZATION,
];

/// The renderer that owns the actual pages.
#[derive(Clone, Debug)]
pub struct PageOrigin {
    http: reqwest::Client,
    base_url: String,
}

impl PageOrigin {
    /// `http` must not follow redirects; the browser has to see them.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default()
    }

    /// Forward `request` unchanged apart from the bearer header.
    pub async fn forward(&self, request: Request, bearer: Option<&str>) -> Result<Response, AppError> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        // The origin resolves dot segments, so only forward what was checked.
        if canonical_path(parts.uri.path()).ok().as_deref() != Some(parts.uri.path()) {
            return Err(AppError::BadRequest(format!(
                "Non-canonical page path: {}",
                parts.uri.path()
            )));
        }
        let url = format!("{}{}", self.base_url, path_and_query);

        let body: Bytes = axum::body::to_bytes(body, MAX_FORWARD_BODY)
            .await
            .map_err(|e| AppError::BadRequest(format!("Unreadable request body: {e}")))?;

        let mut headers = strip_hop_by_hop(parts.headers);
        if let Some(token) = bearer {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }

        let upstream = self
            .http
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = upstream.status();
        let headers = strip_hop_by_hop(upstream.headers().clone());
        let bytes = upstream
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        tracing::debug!(url = %url, status = status.as_u16(), "Forwarded page request");

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}
