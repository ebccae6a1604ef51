// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student profile store contract and in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::StudentProfile;
use crate::accounts::store::{StoreError, StoreResult};

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a profile. Fails with `AlreadyExists` on a duplicate user or IIN.
    async fn create(&self, profile: StudentProfile) -> StoreResult<StudentProfile>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<StudentProfile>;

    async fn find_by_user_id(&self, user_id: Uuid) -> StoreResult<StudentProfile>;

    /// Replace an existing profile; bumps `updated_at`.
    async fn update(&self, profile: StudentProfile) -> StoreResult<StudentProfile>;

    async fn exists_by_iin(&self, iin: &str) -> StoreResult<bool>;

    async fn exists_by_user_id(&self, user_id: Uuid) -> StoreResult<bool>;
}

#[derive(Default)]
pub struct InMemoryStudentStore {
    profiles: RwLock<HashMap<Uuid, StudentProfile>>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn create(&self, profile: StudentProfile) -> StoreResult<StudentProfile> {
        let mut profiles = self.profiles.write().await;

        if profiles.values().any(|p| p.user_id == profile.user_id) {
            return Err(StoreError::AlreadyExists(format!(
                "Profile for user {}",
                profile.user_id
            )));
        }
        if profiles.values().any(|p| p.iin == profile.iin) {
            return Err(StoreError::AlreadyExists("Profile with given IIN".to_string()));
        }

        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<StudentProfile> {
        self.profiles
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile {id}")))
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> StoreResult<StudentProfile> {
        self.profiles
            .read()
            .await
            .values()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Profile for user {user_id}")))
    }

    async fn update(&self, mut profile: StudentProfile) -> StoreResult<StudentProfile> {
        let mut profiles = self.profiles.write().await;

        if !profiles.contains_key(&profile.id) {
            return Err(StoreError::NotFound(format!("Profile {}", profile.id)));
        }

        profile.updated_at = Utc::now();
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn exists_by_iin(&self, iin: &str) -> StoreResult<bool> {
        Ok(self.profiles.read().await.values().any(|p| p.iin == iin))
    }

    async fn exists_by_user_id(&self, user_id: Uuid) -> StoreResult<bool> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .any(|p| p.user_id == user_id))
    }
}
