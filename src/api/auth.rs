// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and token-refresh endpoints.

use axum::{extract::State, Json};

use crate::auth::AuthError;
use crate::error::ApiResponse;
use crate::models::{LoginRequest, RefreshRequest, TokenPairResponse};
use crate::state::AppState;

/// Exchange a provider access token for a session credential pair.
///
/// Creates the user record on first login for the identity. Always
/// replaces the stored refresh token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credential pair issued", body = TokenPairResponse),
        (status = 400, description = "Provider credential missing"),
        (status = 401, description = "Identity provider rejected the credential"),
        (status = 502, description = "Identity provider unavailable"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, AuthError> {
    let issued = state.auth.login(&request.provider_credential).await?;
    Ok(Json(ApiResponse::ok(issued.into())))
}

/// Rotate a refresh token into a new credential pair.
///
/// Single-use: the presented token is consumed whether or not the caller
/// stores the replacement.
#[utoipa::path(
    post,
    path = "/auth/token/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New credential pair issued", body = TokenPairResponse),
        (status = 401, description = "Refresh token missing, invalid, or expired"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenPairResponse>>, AuthError> {
    let issued = state.auth.rotate(&request.refresh_token).await?;
    Ok(Json(ApiResponse::ok(issued.into())))
}
