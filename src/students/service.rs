// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student profile operations. The caller's identity comes from gateway
//! headers and is taken as given.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::models::{
    parse_university_id, CreateProfileRequest, StudentProfile, UpdateProfileRequest,
};
use super::store::StudentStore;
use crate::accounts::store::StoreError;
use crate::error::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Student profile already exists")]
    AlreadyExists,

    #[error("IIN is already registered")]
    IinTaken,

    #[error("Student profile not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ProfileError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ProfileError::NotFound,
            StoreError::AlreadyExists(_) => ProfileError::AlreadyExists,
            StoreError::Backend(msg) => ProfileError::Internal(msg),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::AlreadyExists | ProfileError::IinTaken => ApiError::conflict(e.to_string()),
            ProfileError::NotFound => ApiError::not_found(e.to_string()),
            ProfileError::Internal(detail) => {
                tracing::error!(error = %detail, "student service internal error");
                ApiError::internal()
            }
        }
    }
}

pub struct StudentService {
    store: Arc<dyn StudentStore>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    pub async fn create_profile(
        &self,
        user_id: Uuid,
        request: CreateProfileRequest,
    ) -> Result<StudentProfile, ProfileError> {
        if self.store.exists_by_user_id(user_id).await? {
            return Err(ProfileError::AlreadyExists);
        }
        if self.store.exists_by_iin(&request.iin).await? {
            return Err(ProfileError::IinTaken);
        }

        let now = Utc::now();
        let profile = StudentProfile {
            id: Uuid::new_v4(),
            user_id,
            first_name: request.first_name,
            last_name: request.last_name,
            iin: request.iin,
            university_id: parse_university_id(request.university_id.as_deref()),
            created_at: now,
            updated_at: now,
        };

        let profile = self.store.create(profile).await?;
        tracing::info!(profile_id = %profile.id, user_id = %user_id, "student profile created");
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<StudentProfile, ProfileError> {
        Ok(self.store.find_by_user_id(user_id).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<StudentProfile, ProfileError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<StudentProfile, ProfileError> {
        let mut profile = self.store.find_by_user_id(user_id).await?;

        if let Some(first_name) = request.first_name.filter(|s| !s.is_empty()) {
            profile.first_name = first_name;
        }
        if let Some(last_name) = request.last_name.filter(|s| !s.is_empty()) {
            profile.last_name = last_name;
        }
        if let Some(university_id) = parse_university_id(request.university_id.as_deref()) {
            profile.university_id = Some(university_id);
        }

        Ok(self.store.update(profile).await?)
    }
}
