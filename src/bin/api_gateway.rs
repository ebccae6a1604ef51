// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc, time::Duration};

use career_platform::{
    auth::{GatewayAuth, TokenManager},
    config::{GatewayConfig, DEFAULT_JWT_EXPIRATION_HOURS},
    gateway::{self, Proxy, RouteTable},
    logging, server,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // The gateway only verifies; the access lifetime is never used to issue.
    let lifetime = Duration::from_secs(DEFAULT_JWT_EXPIRATION_HOURS * 3600);
    let tokens = match TokenManager::new(&config.jwt_secret, lifetime) {
        Ok(tokens) => Arc::new(tokens),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialise token verifier");
            return ExitCode::FAILURE;
        }
    };

    let proxy = match Proxy::new(config.proxy_timeout, config.proxy_max_body_bytes) {
        Ok(proxy) => proxy,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build proxy client");
            return ExitCode::FAILURE;
        }
    };

    let routes = RouteTable::standard(
        config.auth_service_url.clone(),
        config.student_service_url.clone(),
        config.employer_service_url.clone(),
        config.students_required_role,
        config.employers_required_role,
    );
    for route in routes.routes() {
        tracing::info!(prefix = %route.prefix, upstream = %route.upstream, access = ?route.access, "Route");
    }

    let auth = GatewayAuth::new(tokens, config.missing_role_policy);
    let app = server::with_http_layers(gateway::router(&routes, auth, proxy));

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %config.bind_addr,
        missing_role_policy = config.missing_role_policy.as_str(),
        "API gateway listening"
    );

    if let Err(e) = server::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
