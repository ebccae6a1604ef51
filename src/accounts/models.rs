// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Data Models
//!
//! The stored [`Principal`], its public [`PrincipalView`] projection and the
//! request/response bodies of the auth service. Request types derive
//! `Deserialize` and `ToSchema`; each has a `validate` method returning the
//! first problem found as a human-readable message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Role, TokenPair};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Principal
// =============================================================================

/// A registered user as held by the credential store.
///
/// Not serializable: the password hash must never leave the service. Use
/// [`PrincipalView`] for responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    /// Trimmed, lowercased login email (unique)
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// Create an active principal with a fresh ID.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public projection of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrincipalView {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Principal> for PrincipalView {
    fn from(p: &Principal) -> Self {
        Self {
            id: p.id,
            email: p.email.clone(),
            role: p.role,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email
    #[schema(example = "user@example.com")]
    pub email: String,
    /// At least 8 characters
    #[schema(example = "password123")]
    pub password: String,
    /// One of `student`, `employer`, `university`, `admin`
    #[schema(example = "student")]
    pub role: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        if self.role.trim().is_empty() {
            return Err("role is required".to_string());
        }
        Ok(())
    }
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

/// Request to exchange a refresh token for a new pair.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl RefreshRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_token.trim().is_empty() {
            return Err("refresh_token is required".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: PrincipalView,
    pub tokens: TokenPair,
}

// =============================================================================
// Helpers
// =============================================================================

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("email is required".to_string());
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err("email must be a valid email address".to_string())
    }
}
