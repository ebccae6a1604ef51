// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    accounts::{AuthResponse, LoginRequest, PrincipalView, RefreshRequest, RegisterRequest},
    auth::{Auth, TokenPair},
    error::{ApiError, ErrorBody},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or role", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;

    let response = state.accounts.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 403, description = "Account deactivated", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;

    Ok(Json(state.accounts.login(request).await?))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "New token pair", body = TokenPair),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Refresh token invalid or expired", body = ErrorBody)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::validation)?;

    Ok(Json(state.accounts.refresh(request.refresh_token.trim()).await?))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = PrincipalView),
        (status = 401, description = "Missing, invalid or expired access token"),
        (status = 404, description = "User no longer exists", body = ErrorBody)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(user): Auth,
) -> Result<Json<PrincipalView>, ApiError> {
    Ok(Json(state.accounts.get_profile(user.user_id).await?))
}
