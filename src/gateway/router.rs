// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway router assembly.
//!
//! ```text
//! strip identity headers (every request)
//!   ├── GET /health
//!   ├── /api/auth/**        public          → auth service
//!   ├── /api/students/**    authenticate    → student service
//!   │                        [require role]
//!   └── /api/employers/**   authenticate    → employer service
//!                            [require role]
//! ```

use axum::{
    extract::{Request, State},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use url::Url;

use super::proxy::Proxy;
use super::routes::{RouteAccess, RouteTable, ServiceRoute};
use crate::auth::middleware::{authenticate, require_role, strip_identity};
use crate::auth::GatewayAuth;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub status: &'static str,
    pub service: &'static str,
}

/// Per-route handler state.
#[derive(Clone)]
struct Upstream {
    base: Url,
    proxy: Proxy,
}

/// Build the gateway router from a routing table.
pub fn router(routes: &RouteTable, auth: GatewayAuth, proxy: Proxy) -> Router {
    let mut app = Router::new().route("/health", get(health));

    for route in routes.routes() {
        app = app.merge(service_router(route, &auth, &proxy));
    }

    app.fallback(not_found)
        .layer(middleware::from_fn(strip_identity))
}

fn service_router(route: &ServiceRoute, auth: &GatewayAuth, proxy: &Proxy) -> Router {
    let [bare, subtree] = route.patterns();
    let upstream = Upstream {
        base: route.upstream.clone(),
        proxy: proxy.clone(),
    };

    let router = Router::new()
        .route(&bare, any(forward))
        .route(&subtree, any(forward))
        .with_state(upstream);

    match route.access {
        RouteAccess::Public => router,
        RouteAccess::Authenticated { required_role } => {
            let router = match required_role {
                Some(role) => router.route_layer(middleware::from_fn_with_state(role, require_role)),
                None => router,
            };
            router.route_layer(middleware::from_fn_with_state(auth.clone(), authenticate))
        }
    }
}

async fn forward(State(upstream): State<Upstream>, request: Request) -> Response {
    match upstream.proxy.forward(&upstream.base, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn health() -> Json<GatewayHealth> {
    Json(GatewayHealth {
        status: "ok",
        service: "api-gateway",
    })
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
