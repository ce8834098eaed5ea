// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - remote API client, account flows, page forwarding.

pub mod account;
pub mod api;
pub mod pages;

pub use account::Account;
pub use api::ApiClient;
pub use pages::PageOrigin;
