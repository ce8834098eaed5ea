// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Study-Gate: session gating in front of the study-tools web app
//!
//! This crate checks the session cookie on every page request, verifies
//! admin tokens, resolves the current user against the remote API, and
//! forwards allowed requests to the page renderer.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use services::{ApiClient, PageOrigin};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub pages: PageOrigin,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let api = ApiClient::new(config.api_base_url.clone());
        let pages = PageOrigin::new(PageOrigin::client(), config.page_origin.clone());
        Self { config, api, pages }
    }
}
