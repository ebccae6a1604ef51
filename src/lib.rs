// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Career Platform - token authentication for a gateway-fronted service mesh
//!
//! Clients authenticate once against the auth service and present a signed
//! access token to the API gateway. The gateway verifies the token, then
//! forwards the request to a backend with the caller's identity stamped into
//! `X-User-ID` / `X-User-Role`. Backends trust those headers and never see
//! the token.
//!
//! ## Modules
//!
//! - `auth` - Token codec and manager, password hashing, gateway middleware,
//!   trusted identity extractor
//! - `accounts` - Credential store and authentication service
//! - `api` - Auth service HTTP handlers (Axum)
//! - `gateway` - Route table and reverse proxy
//! - `students` - Student profile service (downstream trust consumer)
//! - `config` - Environment configuration for each binary
//! - `logging` - Tracing subscriber setup
//! - `server` - Request ids, request tracing and graceful serving

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod state;
pub mod students;
