// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication service: registration, login, refresh and profile lookup.
//!
//! Every operation is a single pass over the credential store and the token
//! manager; nothing is held between calls.

use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::models::{
    normalize_email, AuthResponse, LoginRequest, Principal, PrincipalView, RegisterRequest,
};
use super::store::{CredentialStore, StoreError};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Role, TokenError, TokenManager, TokenPair};
use crate::error::ApiError;

/// Auth service failures.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid user role")]
    InvalidRole,

    #[error("A user with this email already exists")]
    UserAlreadyExists,

    /// Unknown email and wrong password share this variant
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    UserNotActive,

    #[error("User not found")]
    NotFound,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TokenError> for AccountError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AccountError::ExpiredToken,
            TokenError::Invalid => AccountError::InvalidToken,
            other => AccountError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AccountError::NotFound,
            StoreError::AlreadyExists(_) => AccountError::UserAlreadyExists,
            StoreError::Backend(msg) => AccountError::Internal(msg),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::InvalidRole => ApiError::validation(e.to_string()),
            AccountError::UserAlreadyExists => ApiError::conflict(e.to_string()),
            AccountError::InvalidCredentials
            | AccountError::InvalidToken
            | AccountError::ExpiredToken => ApiError::unauthorized(e.to_string()),
            AccountError::UserNotActive => ApiError::forbidden(e.to_string()),
            AccountError::NotFound => ApiError::not_found(e.to_string()),
            AccountError::Internal(detail) => {
                tracing::error!(error = %detail, "auth service internal error");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Orchestrates the credential store and token manager.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenManager>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenManager>) -> Self {
        Self { store, tokens }
    }

    /// Register a principal and issue its first token pair.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AccountError> {
        let role = Role::from_str(request.role.trim()).ok_or(AccountError::InvalidRole)?;
        let email = normalize_email(&request.email);

        if self.store.exists_by_email(&email).await? {
            return Err(AccountError::UserAlreadyExists);
        }

        let password_hash = hash_blocking(request.password).await?;
        // The store re-checks uniqueness for concurrent registrations.
        let principal = self
            .store
            .create(Principal::new(email, password_hash, role))
            .await?;

        tracing::info!(user_id = %principal.id, role = %principal.role, "user registered");
        self.auth_response(&principal)
    }

    /// Authenticate with email and password.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AccountError> {
        let email = normalize_email(&request.email);

        let principal = match self.store.find_by_email(&email).await {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Err(AccountError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !principal.is_active {
            return Err(AccountError::UserNotActive);
        }

        if !verify_blocking(request.password, principal.password_hash.clone()).await? {
            tracing::debug!(user_id = %principal.id, "password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(user_id = %principal.id, "user logged in");
        self.auth_response(&principal)
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The presented refresh token stays valid until its own expiry.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AccountError> {
        let claims = self.tokens.validate_refresh(refresh_token)?;
        let principal = self.store.find_by_id(claims.user_id).await?;

        if !principal.is_active {
            return Err(AccountError::UserNotActive);
        }

        Ok(self
            .tokens
            .issue_pair(principal.id, &principal.email, principal.role)?)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<PrincipalView, AccountError> {
        let principal = self.store.find_by_id(user_id).await?;
        Ok(PrincipalView::from(&principal))
    }

    fn auth_response(&self, principal: &Principal) -> Result<AuthResponse, AccountError> {
        let tokens = self
            .tokens
            .issue_pair(principal.id, &principal.email, principal.role)?;
        Ok(AuthResponse {
            user: PrincipalView::from(principal),
            tokens,
        })
    }
}

async fn hash_blocking(password: String) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AccountError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| AccountError::Internal(e.to_string()))
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AccountError::Internal(format!("verification task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::store::InMemoryCredentialStore;
    use axum::http::StatusCode;
    use secrecy::SecretString;
    use std::time::Duration;

    fn setup() -> (AuthService, Arc<InMemoryCredentialStore>, Arc<TokenManager>) {
        let store = Arc::new(InMemoryCredentialStore::new());
        let tokens = Arc::new(
            TokenManager::new(&SecretString::from("service-secret"), Duration::from_secs(3600))
                .unwrap(),
        );
        let service = AuthService::new(store.clone(), tokens.clone());
        (service, store, tokens)
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            role: role.to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_issues_valid_pair() {
        let (service, _, tokens) = setup();
        let response = service
            .register(register_request("Alice@Example.com ", "student"))
            .await
            .unwrap();

        assert_eq!(response.user.email, "alice@example.com");
        assert_eq!(response.user.role, Role::Student);
        assert!(response.user.is_active);
        assert_eq!(response.tokens.token_type, "Bearer");
        assert_eq!(response.tokens.expires_in, 3600);

        let claims = tokens.validate_access(&response.tokens.access_token).unwrap();
        assert_eq!(claims.user_id, response.user.id);
        assert!(tokens.validate_refresh(&response.tokens.refresh_token).is_ok());
    }

    #[tokio::test]
    async fn register_rejects_unknown_role() {
        let (service, _, _) = setup();
        let err = service
            .register(register_request("a@b.io", "superuser"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidRole));
    }

    #[tokio::test]
    async fn register_twice_conflicts_case_insensitively() {
        let (service, _, _) = setup();
        service.register(register_request("dup@b.io", "employer")).await.unwrap();

        let err = service
            .register(register_request("DUP@b.io", "student"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let (service, store, _) = setup();
        let response = service.register(register_request("h@b.io", "student")).await.unwrap();

        let stored = store.find_by_id(response.user.id).await.unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn login_success_and_failures_look_alike() {
        let (service, _, _) = setup();
        service.register(register_request("l@b.io", "student")).await.unwrap();

        let ok = service.login(login_request("L@B.io", "password123")).await.unwrap();
        assert_eq!(ok.user.email, "l@b.io");

        let wrong_password = service
            .login(login_request("l@b.io", "password124"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login_request("nobody@b.io", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn inactive_principal_cannot_login_or_refresh() {
        let (service, store, _) = setup();
        let response = service.register(register_request("off@b.io", "student")).await.unwrap();

        let mut principal = store.find_by_id(response.user.id).await.unwrap();
        principal.is_active = false;
        store.update(principal).await.unwrap();

        let err = service
            .login(login_request("off@b.io", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::UserNotActive));

        let err = service.refresh(&response.tokens.refresh_token).await.unwrap_err();
        assert!(matches!(err, AccountError::UserNotActive));
    }

    #[tokio::test]
    async fn refresh_rotates_without_revoking() {
        let (service, _, tokens) = setup();
        let first = service.register(register_request("r@b.io", "student")).await.unwrap();

        let second = service.refresh(&first.tokens.refresh_token).await.unwrap();
        assert_ne!(second.access_token, first.tokens.access_token);
        assert!(tokens.validate_access(&second.access_token).is_ok());

        // The old refresh token still works.
        assert!(service.refresh(&first.tokens.refresh_token).await.is_ok());
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let (service, _, _) = setup();
        let response = service.register(register_request("t@b.io", "student")).await.unwrap();

        let err = service.refresh(&response.tokens.access_token).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidToken));
    }

    #[tokio::test]
    async fn refresh_for_deleted_principal_is_not_found() {
        let (service, store, _) = setup();
        let response = service.register(register_request("d@b.io", "student")).await.unwrap();
        store.delete(response.user.id).await.unwrap();

        let err = service.refresh(&response.tokens.refresh_token).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn get_profile_projects_view() {
        let (service, _, _) = setup();
        let response = service.register(register_request("p@b.io", "admin")).await.unwrap();

        let view = service.get_profile(response.user.id).await.unwrap();
        assert_eq!(view, response.user);

        let err = service.get_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[test]
    fn error_status_mapping() {
        let cases = [
            (AccountError::InvalidRole, StatusCode::BAD_REQUEST),
            (AccountError::UserAlreadyExists, StatusCode::CONFLICT),
            (AccountError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AccountError::UserNotActive, StatusCode::FORBIDDEN),
            (AccountError::NotFound, StatusCode::NOT_FOUND),
            (AccountError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AccountError::ExpiredToken, StatusCode::UNAUTHORIZED),
            (AccountError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn internal_error_hides_detail() {
        let api = ApiError::from(AccountError::Internal("connection string leaked".into()));
        assert!(!api.message.contains("leaked"));
    }
}
