// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canonical request paths.
//!
//! Access is decided on the path, and the page renderer's URL parser resolves
//! dot segments, so both must see the same path. Requests whose path is not
//! canonical are redirected to the canonical form before any other layer runs.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Malformed percent escape in request path")]
pub struct MalformedPath;

/// Canonical form of `path`.
///
/// Percent-escaped unreserved characters are decoded, `\` is treated as `/`,
/// `.` and `..` segments are resolved, and empty segments (including a
/// trailing slash) are dropped. Other escapes, such as `%2F`, are kept as is.
pub fn canonical_path(path: &str) -> Result<String, MalformedPath> {
    let decoded = decode_unreserved(path)?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    Ok(format!("/{}", segments.join("/")))
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn decode_unreserved(path: &str) -> Result<String, MalformedPath> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let hex = bytes.get(i + 1..i + 3).ok_or(MalformedPath)?;
        if !hex.iter().all(u8::is_ascii_hexdigit) {
            return Err(MalformedPath);
        }
        let byte = hex
            .iter()
            .fold(0u8, |acc, digit| acc * 16 + hex_value(*digit));

        if is_unreserved(byte) {
            out.push(byte);
        } else {
            out.extend_from_slice(&bytes[i..i + 3]);
        }
        i += 3;
    }

    String::from_utf8(out).map_err(|_| MalformedPath)
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Middleware redirecting non-canonical paths (`308`) and rejecting
/// malformed ones (`400`).
pub async fn require_canonical_path(request: Request, next: Next) -> Response {
    let path = request.uri().path();

    let canonical = match canonical_path(path) {
        Ok(canonical) => canonical,
        Err(err) => {
            tracing::info!(path = %path, "Rejected malformed path");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    if canonical != path {
        let location = match request.uri().query() {
            Some(query) => format!("{canonical}?{query}"),
            None => canonical,
        };
        tracing::info!(path = %path, to = %location, "Redirecting to canonical path");
        return Redirect::permanent(&location).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_paths_are_unchanged() {
        for path in ["/", "/dashboard", "/admin/support/42", "/documents/a%2Fb", "/q%20a"] {
            assert_eq!(canonical_path(path).unwrap(), path);
        }
    }

    #[test]
    fn test_dot_segments_resolve() {
        assert_eq!(canonical_path("/x/../admin/support").unwrap(), "/admin/support");
        assert_eq!(canonical_path("/x/%2e%2e/dashboard").unwrap(), "/dashboard");
        assert_eq!(canonical_path("/x/.%2E/dashboard").unwrap(), "/dashboard");
        assert_eq!(canonical_path("/./dashboard/.").unwrap(), "/dashboard");
        assert_eq!(canonical_path("/../../admin").unwrap(), "/admin");
    }

    #[test]
    fn test_separators_collapse() {
        assert_eq!(canonical_path("//admin//support/").unwrap(), "/admin/support");
        assert_eq!(canonical_path("/x\\..\\admin").unwrap(), "/admin");
        assert_eq!(canonical_path("/dashboard/").unwrap(), "/dashboard");
    }

    #[test]
    fn test_unreserved_escapes_decode() {
        assert_eq!(canonical_path("/%61dmin/support").unwrap(), "/admin/support");
        assert_eq!(canonical_path("/sign%2Din").unwrap(), "/sign-in");
    }

    #[test]
    fn test_malformed_escapes_rejected() {
        assert_eq!(canonical_path("/admin%2"), Err(MalformedPath));
        assert_eq!(canonical_path("/admin%zz"), Err(MalformedPath));
        assert_eq!(canonical_path("/admin%+1"), Err(MalformedPath));
        assert_eq!(canonical_path("/%ff"), Ok("/%ff".to_string()));
    }
}
