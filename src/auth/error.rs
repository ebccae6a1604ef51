// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors raised at HTTP edges (gateway middleware and the
//! `Auth` extractor).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::codec::TokenError;
use super::roles::Role;

/// Authentication / authorization failure at a request edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthHeader,

    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    /// Signed token without a claim the edge depends on
    #[error("Token is missing the '{0}' claim")]
    MissingClaim(&'static str),

    /// No role in the request context
    #[error("Role not found in request context")]
    RoleNotFound,

    #[error("Access denied for role '{actual}' (requires '{required}')")]
    InsufficientPermissions { required: Role, actual: String },
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
    message: String,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::MissingClaim(_) => "missing_claim",
            AuthError::RoleNotFound => "role_not_found",
            AuthError::InsufficientPermissions { .. } => "insufficient_permissions",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::RoleNotFound | AuthError::InsufficientPermissions { .. } => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn category(&self) -> &'static str {
        if self.status_code() == StatusCode::FORBIDDEN {
            "forbidden"
        } else {
            "unauthorized"
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AuthError::TokenExpired,
            // Everything else fails closed as an unusable token.
            _ => AuthError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.category(),
            error_code: self.error_code(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
