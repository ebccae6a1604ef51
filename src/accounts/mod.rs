// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User accounts: principals, the credential store and the auth service.

pub mod models;
pub mod service;
pub mod store;

pub use models::{
    AuthResponse, LoginRequest, Principal, PrincipalView, RefreshRequest, RegisterRequest,
};
pub use service::{AccountError, AuthService};
pub use store::{CredentialStore, InMemoryCredentialStore, StoreError, StoreResult};
