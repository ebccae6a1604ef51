// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuance and verification, plus the identity contract between the
//! gateway and internal services.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in at the auth service and receives an
//!    access/refresh token pair (HS256, shared secret)
//! 2. Client sends `Authorization: Bearer <access token>` to the gateway
//! 3. Gateway:
//!    - Strips any client-supplied `X-User-ID` / `X-User-Role`
//!    - Verifies signature, algorithm, expiry, not-before, issuer and token kind
//!    - Stamps `X-User-ID` / `X-User-Role` and proxies to the owning service
//! 4. Internal services trust the stamped headers without re-verification
//!
//! ## Security
//!
//! - Access and refresh tokens are never interchangeable
//! - Only the HMAC algorithm family is accepted
//! - No clock-skew leeway by default
//! - Refresh tokens are not revoked after use

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod manager;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod trusted;

pub use claims::{AuthenticatedUser, IdentityClaims, TokenKind, ISSUER};
pub use codec::{TokenCodec, TokenError};
pub use error::AuthError;
pub use extractor::Auth;
pub use manager::{TokenManager, TokenPair, REFRESH_MULTIPLIER};
pub use middleware::{GatewayAuth, MissingRolePolicy};
pub use roles::Role;
pub use trusted::{TrustedIdentity, X_USER_ID, X_USER_ROLE};
