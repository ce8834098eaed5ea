// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (canonical paths, edge gate, token verification,
//! security headers).

pub mod canonical_path;
pub mod edge_gate;
pub mod security;
pub mod token;

pub use canonical_path::{canonical_path, require_canonical_path};
pub use edge_gate::{edge_gate, GateToken};
