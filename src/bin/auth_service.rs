// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use career_platform::{
    accounts::InMemoryCredentialStore, api, auth::TokenManager, config::AuthServiceConfig,
    logging, server, state::AppState,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match AuthServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let tokens = match TokenManager::new(&config.jwt_secret, config.access_lifetime) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise token manager");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(Arc::new(InMemoryCredentialStore::new()), tokens);
    let app = server::with_http_layers(api::router(state));

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        access_lifetime_secs = config.access_lifetime.as_secs(),
        "Auth service listening (docs at /docs)"
    );

    if let Err(e) = server::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
