// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token codec.
//!
//! Tokens are compact JWS strings (`header.payload.signature`, base64url)
//! signed with HMAC-SHA256 under a shared secret. Verification accepts only
//! the HMAC family, so a token that advertises `none` or an asymmetric
//! algorithm is rejected before any key is consulted.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use super::claims::{IdentityClaims, ISSUER};

/// Algorithm used for every token this crate signs.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on verification.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Token codec errors.
///
/// `Invalid` and `Expired` map to the same HTTP status but carry different
/// user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed, bad signature, wrong algorithm, wrong kind, missing claim
    #[error("token is invalid")]
    Invalid,

    /// Structurally valid but past `exp`
    #[error("token has expired")]
    Expired,

    /// No signing key configured
    #[error("signing key is not configured")]
    MissingSigningKey,

    /// Encoding failed
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Signs and verifies [`IdentityClaims`].
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec over the shared secret.
    ///
    /// `leeway_secs` is the clock-skew tolerance applied to `exp` and `nbf`.
    pub fn new(secret: &SecretString, leeway_secs: u64) -> Result<Self, TokenError> {
        let secret = secret.expose_secret().as_bytes();
        if secret.is_empty() {
            return Err(TokenError::MissingSigningKey);
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Serialize and sign a claims set.
    ///
    /// Output is deterministic for identical claims.
    pub fn sign(&self, claims: &IdentityClaims) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Parse, verify and time-check a token.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                kind => {
                    tracing::debug!(reason = ?kind, "token rejected");
                    TokenError::Invalid
                }
            })
    }
}
