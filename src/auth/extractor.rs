// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a valid access token:
//!
//! ```rust,ignore
//! async fn me(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! The extractor works with any router state from which an
//! `Arc<TokenManager>` can be obtained via `FromRef`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, TokenManager};

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the bearer token out of the `Authorization` header.
///
/// The scheme must be exactly `"Bearer "` (case-sensitive, single space) and
/// the token must be non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Extractor for authenticated users.
///
/// Validates the bearer access token locally. If a middleware has already
/// authenticated the request, the user it stored in extensions is reused.
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
    Arc<TokenManager>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(&parts.headers)?;
        let tokens = Arc::<TokenManager>::from_ref(state);
        let claims = tokens.validate_access(token)?;

        Ok(Auth(AuthenticatedUser::from_claims(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::Request;
    use secrecy::SecretString;
    use std::time::Duration;
    use uuid::Uuid;

    fn tokens() -> Arc<TokenManager> {
        Arc::new(
            TokenManager::new(&SecretString::from("extractor-secret"), Duration::from_secs(600))
                .unwrap(),
        )
    }

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingAuthHeader));

        for bad in ["Basic abc", "bearer abc", "Bearer", "Bearer ", "Token abc"] {
            headers.insert(AUTHORIZATION, bad.parse().unwrap());
            assert_eq!(bearer_token(&headers), Err(AuthError::InvalidAuthHeader), "{bad:?}");
        }

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let mut parts = parts(None);
        let result = Auth::from_request_parts(&mut parts, &tokens()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_extractor_accepts_access_token() {
        let tokens = tokens();
        let id = Uuid::new_v4();
        let pair = tokens.issue_pair(id, "me@example.com", Role::Student).unwrap();

        let header = format!("Bearer {}", pair.access_token);
        let mut parts = parts(Some(&header));
        let Auth(user) = Auth::from_request_parts(&mut parts, &tokens).await.unwrap();

        assert_eq!(user.user_id, id);
        assert_eq!(user.email, "me@example.com");
        assert_eq!(user.role, Some(Role::Student));
    }

    #[tokio::test]
    async fn auth_extractor_rejects_refresh_token() {
        let tokens = tokens();
        let pair = tokens
            .issue_pair(Uuid::new_v4(), "me@example.com", Role::Student)
            .unwrap();

        let header = format!("Bearer {}", pair.refresh_token);
        let mut parts = parts(Some(&header));
        let result = Auth::from_request_parts(&mut parts, &tokens).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let mut parts = parts(None);
        let user = AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "from@middleware.io".to_string(),
            role: Some(Role::Admin),
            expires_at: 0,
        };
        parts.extensions.insert(user.clone());

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &tokens()).await.unwrap();
        assert_eq!(extracted, user);
    }
}
