// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{Auth, AuthenticatedIdentity};
use crate::error::ApiResponse;

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserMeResponse {
    /// Internal user id.
    pub user_id: Uuid,
    /// Expiry of the access token used for this request (Unix seconds).
    pub token_expires_at: i64,
}

impl From<AuthenticatedIdentity> for UserMeResponse {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            token_expires_at: identity.expires_at,
        }
    }
}

/// Get the current authenticated user's identity.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller identity", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(identity): Auth) -> Json<ApiResponse<UserMeResponse>> {
    Json(ApiResponse::ok(identity.into()))
}
