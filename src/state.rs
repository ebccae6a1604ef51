// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::extract::FromRef;

use crate::accounts::{AuthService, CredentialStore};
use crate::auth::TokenManager;

/// Auth service router state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AuthService>,
    pub tokens: Arc<TokenManager>,
}

impl AppState {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenManager>) -> Self {
        Self {
            accounts: Arc::new(AuthService::new(store, tokens.clone())),
            tokens,
        }
    }
}

impl FromRef<AppState> for Arc<TokenManager> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
