// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance policy and kind-checked validation.

use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::claims::{IdentityClaims, TokenKind};
use super::codec::{TokenCodec, TokenError};
use super::roles::Role;

/// Refresh tokens live this many times longer than access tokens.
pub const REFRESH_MULTIPLIER: u32 = 7;

/// Access + refresh token pair handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues token pairs and validates tokens of an expected kind.
///
/// Both kinds share one signing key; only the `token_type` claim separates
/// them.
pub struct TokenManager {
    codec: TokenCodec,
    access_lifetime: Duration,
}

impl TokenManager {
    /// Create a manager with access lifetime `access_lifetime`.
    pub fn new(secret: &SecretString, access_lifetime: Duration) -> Result<Self, TokenError> {
        Self::with_leeway(secret, access_lifetime, 0)
    }

    /// Create a manager tolerating `leeway_secs` of clock skew.
    pub fn with_leeway(
        secret: &SecretString,
        access_lifetime: Duration,
        leeway_secs: u64,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            codec: TokenCodec::new(secret, leeway_secs)?,
            access_lifetime,
        })
    }

    /// Issue an access/refresh pair for a principal.
    pub fn issue_pair(&self, user_id: Uuid, email: &str, role: Role) -> Result<TokenPair, TokenError> {
        self.issue_pair_at(user_id, email, role, Utc::now().timestamp())
    }

    /// Issue a pair as of `now` (Unix seconds).
    pub fn issue_pair_at(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        now: i64,
    ) -> Result<TokenPair, TokenError> {
        let access_secs = self.access_lifetime_seconds();
        let refresh_secs = access_secs * i64::from(REFRESH_MULTIPLIER);

        let access = IdentityClaims::new(user_id, email, role, TokenKind::Access, now, access_secs);
        let refresh = IdentityClaims::new(user_id, email, role, TokenKind::Refresh, now, refresh_secs);

        Ok(TokenPair {
            access_token: self.codec.sign(&access)?,
            refresh_token: self.codec.sign(&refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: access_secs,
        })
    }

    /// Validate a token that must be an access token.
    pub fn validate_access(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.validate_kind(token, TokenKind::Access)
    }

    /// Validate a token that must be a refresh token.
    pub fn validate_refresh(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.validate_kind(token, TokenKind::Refresh)
    }

    /// Access token lifetime in seconds.
    pub fn access_lifetime_seconds(&self) -> i64 {
        self.access_lifetime.as_secs() as i64
    }

    fn validate_kind(&self, token: &str, expected: TokenKind) -> Result<IdentityClaims, TokenError> {
        let claims = self.codec.verify(token)?;
        if claims.token_type != expected {
            tracing::debug!(
                expected = %expected,
                presented = %claims.token_type,
                "token kind mismatch"
            );
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new(
            &SecretString::from("manager-test-secret"),
            Duration::from_secs(3600),
        )
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_identity() {
        let manager = manager();
        let id = Uuid::new_v4();

        for role in Role::ALL {
            let pair = manager.issue_pair(id, "bob@example.com", role).unwrap();

            let access = manager.validate_access(&pair.access_token).unwrap();
            assert_eq!(access.user_id, id);
            assert_eq!(access.role, Some(role));
            assert_eq!(access.email, "bob@example.com");

            let refresh = manager.validate_refresh(&pair.refresh_token).unwrap();
            assert_eq!(refresh.user_id, id);
            assert_eq!(refresh.role, Some(role));
        }
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let manager = manager();
        let pair = manager
            .issue_pair(Uuid::new_v4(), "k@example.com", Role::Employer)
            .unwrap();

        assert_eq!(
            manager.validate_access(&pair.refresh_token),
            Err(TokenError::Invalid)
        );
        assert_eq!(
            manager.validate_refresh(&pair.access_token),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn refresh_lifetime_is_seven_times_access() {
        let manager = manager();
        let now = Utc::now().timestamp();
        let pair = manager
            .issue_pair_at(Uuid::new_v4(), "t@example.com", Role::Admin, now)
            .unwrap();

        let access = manager.validate_access(&pair.access_token).unwrap();
        let refresh = manager.validate_refresh(&pair.refresh_token).unwrap();

        assert_eq!(access.exp - access.iat, 3600);
        assert_eq!(refresh.exp - refresh.iat, 7 * 3600);
        assert_eq!(access.iat, refresh.iat);
        assert_eq!(access.nbf, refresh.nbf);
        assert_eq!(pair.expires_in, 3600);
        assert_eq!(pair.token_type, "Bearer");
    }

    #[test]
    fn pair_issued_long_ago_has_expired_access_but_live_refresh() {
        let manager = manager();
        let two_hours_ago = Utc::now().timestamp() - 2 * 3600;
        let pair = manager
            .issue_pair_at(Uuid::new_v4(), "old@example.com", Role::Student, two_hours_ago)
            .unwrap();

        assert_eq!(
            manager.validate_access(&pair.access_token),
            Err(TokenError::Expired)
        );
        assert!(manager.validate_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn access_lifetime_is_reported_in_seconds() {
        assert_eq!(manager().access_lifetime_seconds(), 3600);
    }

    #[test]
    fn tokens_from_another_manager_are_rejected() {
        let other = TokenManager::new(
            &SecretString::from("a-different-secret"),
            Duration::from_secs(3600),
        )
        .unwrap();
        let pair = other
            .issue_pair(Uuid::new_v4(), "x@example.com", Role::Student)
            .unwrap();

        assert_eq!(
            manager().validate_access(&pair.access_token),
            Err(TokenError::Invalid)
        );
    }
}
