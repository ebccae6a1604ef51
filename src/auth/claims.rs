// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claims carried inside signed tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roles::Role;

/// Fixed issuer stamped into every token.
pub const ISSUER: &str = "auth-service";

/// Token class. Access and refresh tokens are never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived proof of identity for API calls
    Access,
    /// Long-lived credential exchanged for a new pair
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims payload of a signed token.
///
/// `role` is optional on the wire: tokens issued by this crate always carry
/// it, but the gateway must decide what to do with a signed token that does
/// not (see `MissingRolePolicy`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (principal ID)
    pub user_id: Uuid,

    /// Login email at issuance time
    pub email: String,

    /// Principal role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Access or refresh
    pub token_type: TokenKind,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,

    /// Not before (Unix seconds)
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Token ID, unique per issued token
    #[serde(default)]
    pub jti: Uuid,
}

impl IdentityClaims {
    /// Build a claims set valid for `lifetime_secs` starting at `now`.
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        role: Role,
        token_type: TokenKind,
        now: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            role: Some(role),
            token_type,
            iat: now,
            exp: now + lifetime_secs,
            nbf: now,
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4(),
        }
    }
}

/// Identity established from a verified access token.
///
/// The gateway stores this in request extensions after authentication; the
/// `Auth` extractor returns it to handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    /// `None` only when the missing-role policy let a role-less token through
    pub role: Option<Role>,
    /// Token expiration (Unix seconds)
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: IdentityClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            expires_at: claims.exp,
        }
    }
}
