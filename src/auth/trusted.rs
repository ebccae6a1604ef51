// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity propagation between the gateway and internal services.
//!
//! After validating an access token the gateway stamps two headers onto the
//! forwarded request:
//!
//! | Header | Value |
//! |--------|-------|
//! | `X-User-ID` | principal UUID |
//! | `X-User-Role` | role name, or empty when the token carried none |
//!
//! Internal services read them through [`TrustedIdentity`] and do not
//! re-verify anything. The headers carry no signature, so the network between
//! the gateway and internal services must be closed to clients. The gateway
//! strips both headers from every inbound request before routing.

use axum::{
    extract::FromRequestParts,
    http::{
        header::{HeaderName, HeaderValue, InvalidHeaderValue},
        request::Parts,
        HeaderMap,
    },
};
use uuid::Uuid;

use super::roles::Role;
use crate::error::ApiError;

pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");

/// Remove any identity headers, whatever their count or casing.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    headers.remove(X_USER_ID);
    headers.remove(X_USER_ROLE);
}

/// Stamp identity headers, replacing existing values.
///
/// `None` stamps an empty role.
pub fn stamp_identity_headers(
    headers: &mut HeaderMap,
    user_id: Uuid,
    role: Option<Role>,
) -> Result<(), InvalidHeaderValue> {
    let id = HeaderValue::from_str(&user_id.to_string())?;
    let role = HeaderValue::from_static(role.map(|r| r.as_str()).unwrap_or(""));
    headers.insert(X_USER_ID, id);
    headers.insert(X_USER_ROLE, role);
    Ok(())
}

/// Identity asserted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedIdentity {
    pub user_id: Uuid,
    /// `None` when the header is absent, empty or not a known role
    pub role: Option<Role>,
}

impl TrustedIdentity {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

impl<S> FromRequestParts<S> for TrustedIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(X_USER_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if raw_id.is_empty() {
            return Err(ApiError::unauthorized("User ID not found"));
        }

        let user_id = Uuid::parse_str(raw_id)
            .map_err(|_| ApiError::validation("Invalid User ID format"))?;

        let role = parts
            .headers
            .get(X_USER_ROLE)
            .and_then(|v| v.to_str().ok())
            .and_then(Role::from_str);

        Ok(TrustedIdentity { user_id, role })
    }
}
