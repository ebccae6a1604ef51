// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store contract and its in-memory implementation.
//!
//! The auth service depends only on [`CredentialStore`]; any backend that
//! enforces email uniqueness on `create` and reports missing records as
//! [`StoreError::NotFound`] satisfies it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::Principal;

/// Errors returned by stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for principals.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new principal. Fails with `AlreadyExists` if the email is taken.
    async fn create(&self, principal: Principal) -> StoreResult<Principal>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Principal>;

    /// Look up by normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Principal>;

    /// Replace an existing principal; bumps `updated_at`.
    async fn update(&self, principal: Principal) -> StoreResult<Principal>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;
}

/// Principals held in process memory, keyed by ID.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    principals: RwLock<HashMap<Uuid, Principal>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, principal: Principal) -> StoreResult<Principal> {
        let mut principals = self.principals.write().await;

        if principals.values().any(|p| p.email == principal.email) {
            return Err(StoreError::AlreadyExists(format!(
                "Principal with email {}",
                principal.email
            )));
        }
        if principals.contains_key(&principal.id) {
            return Err(StoreError::AlreadyExists(format!("Principal {}", principal.id)));
        }

        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Principal> {
        self.principals
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Principal {id}")))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Principal> {
        self.principals
            .read()
            .await
            .values()
            .find(|p| p.email == email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Principal with given email".to_string()))
    }

    async fn update(&self, mut principal: Principal) -> StoreResult<Principal> {
        let mut principals = self.principals.write().await;

        if !principals.contains_key(&principal.id) {
            return Err(StoreError::NotFound(format!("Principal {}", principal.id)));
        }
        if principals
            .values()
            .any(|p| p.id != principal.id && p.email == principal.email)
        {
            return Err(StoreError::AlreadyExists(format!(
                "Principal with email {}",
                principal.email
            )));
        }

        principal.updated_at = Utc::now();
        principals.insert(principal.id, principal.clone());
        Ok(principal)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        match self.principals.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("Principal {id}"))),
        }
    }

    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self
            .principals
            .read()
            .await
            .values()
            .any(|p| p.email == email))
    }
}
