// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The token signing secret is server-only. It is read from
//! `TOKEN_SIGNING_SECRET` and never from a browser-visible variable.

use std::env;
use std::fmt;
use std::time::Duration;

/// Default polling period for the notification counter.
pub const DEFAULT_NOTIFICATION_POLL_SECS: u64 = 30;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Base URL of the remote API (auth, documents, notifications)
    pub api_base_url: String,
    /// Origin of the page renderer that allowed requests are forwarded to
    pub page_origin: String,
    /// Server port
    pub port: u16,
    /// Notification counter polling period
    pub notification_poll: Duration,

    // --- Secrets ---
    /// Shared HS256 secret used to verify admin session tokens (raw bytes)
    pub token_signing_secret: Vec<u8>,
    /// Third-party quote API key for the dashboard quote widget; not used by the gate
    pub quote_api_key: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("page_origin", &self.page_origin)
            .field("port", &self.port)
            .field("notification_poll", &self.notification_poll)
            .field("token_signing_secret", &"[redacted]")
            .field("quote_api_key", &self.quote_api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            page_origin: "http://localhost:3000".to_string(),
            port: 8080,
            notification_poll: Duration::from_secs(DEFAULT_NOTIFICATION_POLL_SECS),
            token_signing_secret: b"test_signing_secret_32_bytes_min!".to_vec(),
            quote_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let notification_poll_secs = env::var("NOTIFICATION_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_NOTIFICATION_POLL_SECS);

        let token_signing_secret = env::var("TOKEN_SIGNING_SECRET")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("TOKEN_SIGNING_SECRET"))?;
        if token_signing_secret.is_empty() {
            return Err(ConfigError::Invalid("TOKEN_SIGNING_SECRET", "must not be empty"));
        }

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("API_BASE_URL"))?,
            page_origin: env::var("PAGE_ORIGIN")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            notification_poll: Duration::from_secs(notification_poll_secs),
            token_signing_secret: token_signing_secret.into_bytes(),
            quote_api_key: env::var("QUOTE_API_KEY").ok().filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("API_BASE_URL", "https://api.example.com/");
        env::set_var("TOKEN_SIGNING_SECRET", "  test_signing_secret  ");
        env::set_var("NOTIFICATION_POLL_SECS", "0");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.token_signing_secret, b"test_signing_secret".to_vec());
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.notification_poll,
            Duration::from_secs(DEFAULT_NOTIFICATION_POLL_SECS)
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            quote_api_key: Some("quote-key".to_string()),
            ..Config::default()
        };
        let printed = format!("{config:?}");

        assert!(!printed.contains("test_signing_secret"));
        assert!(!printed.contains("quote-key"));
        assert!(printed.contains("[redacted]"));
    }
}
