// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{process::ExitCode, sync::Arc};

use career_platform::{
    config::StudentServiceConfig,
    logging, server,
    students::{api, InMemoryStudentStore, StudentService},
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let config = match StudentServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let service = Arc::new(StudentService::new(Arc::new(InMemoryStudentStore::new())));
    let app = server::with_http_layers(api::router(service));

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    // Must only be reachable through the gateway: identity headers are trusted as-is.
    tracing::info!(addr = %config.bind_addr, "Student service listening");

    if let Err(e) = server::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
