// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway authentication and authorization middleware.
//!
//! Three layers, applied with `axum::middleware`:
//!
//! - [`strip_identity`] wraps the whole gateway and removes client-supplied
//!   `X-User-ID` / `X-User-Role` from every request, public routes included.
//! - [`authenticate`] validates the bearer access token, stores the
//!   [`AuthenticatedUser`] in request extensions and stamps the identity
//!   headers for the backend.
//! - [`require_role`] gates a route on one exact role.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/students/{*rest}", any(forward))
//!     .route_layer(middleware::from_fn_with_state(Role::Student, require_role))
//!     .route_layer(middleware::from_fn_with_state(gateway_auth, authenticate));
//! ```
//!
//! The last `route_layer` added runs first, so authentication precedes the
//! role check.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::bearer_token;
use super::trusted::{stamp_identity_headers, strip_identity_headers};
use super::{AuthError, AuthenticatedUser, Role, TokenManager};
use crate::error::ApiError;

/// What the gateway does with a valid access token that carries no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRolePolicy {
    /// Respond 401
    #[default]
    Reject,
    /// Forward with an empty `X-User-Role`; role-gated routes still answer 403
    Allow,
}

impl MissingRolePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(MissingRolePolicy::Reject),
            "allow" => Some(MissingRolePolicy::Allow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MissingRolePolicy::Reject => "reject",
            MissingRolePolicy::Allow => "allow",
        }
    }
}

/// State for [`authenticate`].
#[derive(Clone)]
pub struct GatewayAuth {
    pub tokens: Arc<TokenManager>,
    pub missing_role_policy: MissingRolePolicy,
}

impl GatewayAuth {
    pub fn new(tokens: Arc<TokenManager>, missing_role_policy: MissingRolePolicy) -> Self {
        Self {
            tokens,
            missing_role_policy,
        }
    }

    /// Establish the caller's identity from request headers.
    pub fn identify(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.tokens.validate_access(token)?;

        if claims.user_id.is_nil() {
            return Err(AuthError::MissingClaim("user_id"));
        }

        if claims.role.is_none() {
            match self.missing_role_policy {
                MissingRolePolicy::Reject => return Err(AuthError::MissingClaim("role")),
                MissingRolePolicy::Allow => {
                    tracing::warn!(
                        user_id = %claims.user_id,
                        "access token has no role claim; forwarding with empty role"
                    );
                }
            }
        }

        Ok(AuthenticatedUser::from_claims(claims))
    }
}

/// Remove client-supplied identity headers before anything else runs.
pub async fn strip_identity(mut request: Request, next: Next) -> Response {
    strip_identity_headers(request.headers_mut());
    next.run(request).await
}

/// Gateway authentication middleware.
pub async fn authenticate(
    State(auth): State<GatewayAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match auth.identify(request.headers()) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                error_code = e.error_code(),
                "request rejected at gateway"
            );
            return e.into_response();
        }
    };

    if let Err(e) = stamp_identity_headers(request.headers_mut(), user.user_id, user.role) {
        tracing::error!(error = %e, "failed to stamp identity headers");
        return ApiError::internal().into_response();
    }

    tracing::debug!(user_id = %user.user_id, role = ?user.role, "request authenticated");
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Role middleware: the authenticated role must equal `required` exactly.
pub async fn require_role(State(required): State<Role>, request: Request, next: Next) -> Response {
    let role = request
        .extensions()
        .get::<AuthenticatedUser>()
        .and_then(|user| user.role);

    match role {
        None => AuthError::RoleNotFound.into_response(),
        Some(actual) if actual != required => {
            tracing::warn!(
                required = %required,
                actual = %actual,
                path = %request.uri().path(),
                "role check failed"
            );
            AuthError::InsufficientPermissions {
                required,
                actual: actual.to_string(),
            }
            .into_response()
        }
        Some(_) => next.run(request).await,
    }
}
