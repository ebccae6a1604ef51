// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface of the student service.
//!
//! Every route sits behind the gateway. Identity comes from the stamped
//! `X-User-ID` / `X-User-Role` headers via [`TrustedIdentity`]; no token is
//! ever seen here.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::models::{CreateProfileRequest, StudentProfile, UpdateProfileRequest};
use super::service::StudentService;
use crate::auth::{Role, TrustedIdentity};
use crate::error::ApiError;

pub type StudentState = Arc<StudentService>;

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub service: &'static str,
}

pub fn router(service: StudentState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/students/profile",
            get(get_profile).post(create_profile).put(update_profile),
        )
        .route("/api/students/{id}", get(get_by_id))
        .with_state(service)
}

pub async fn health() -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "ok",
        service: "student-service",
    })
}

pub async fn create_profile(
    State(service): State<StudentState>,
    identity: TrustedIdentity,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentProfile>), ApiError> {
    if !identity.has_role(Role::Student) {
        return Err(ApiError::forbidden(
            "Only students can create a student profile",
        ));
    }

    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;

    let profile = service.create_profile(identity.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn get_profile(
    State(service): State<StudentState>,
    identity: TrustedIdentity,
) -> Result<Json<StudentProfile>, ApiError> {
    Ok(Json(service.get_profile(identity.user_id).await?))
}

pub async fn update_profile(
    State(service): State<StudentState>,
    identity: TrustedIdentity,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<StudentProfile>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(service.update_profile(identity.user_id, request).await?))
}

pub async fn get_by_id(
    State(service): State<StudentState>,
    Path(id): Path<String>,
) -> Result<Json<StudentProfile>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::validation("Invalid ID format"))?;
    Ok(Json(service.get_by_id(id).await?))
}
