// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authenticated identity and its Axum extractor.
//!
//! The request gate attaches an [`AuthenticatedIdentity`] to the request
//! extensions after validating the bearer token. Handlers receive it via
//! the [`Auth`] extractor:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.user_id is the validated caller
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::state::AppState;

use super::error::AuthError;

/// The validated caller of a request.
///
/// Produced only by access-token validation; carrying it by value keeps
/// identity an explicit request-scoped input rather than ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// Internal user id (token `sub` claim).
    pub user_id: Uuid,
    /// Access-token expiry, seconds since epoch.
    pub expires_at: i64,
}

/// Extractor for handlers behind the authentication gate.
pub struct Auth(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The gate normally ran already and left the identity behind.
        if let Some(identity) = parts.extensions.get::<AuthenticatedIdentity>().copied() {
            return Ok(Auth(identity));
        }

        // Handler mounted without the gate: validate the header directly.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MissingCredentials)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        let identity = state.codec.validate(token).map_err(|kind| {
            tracing::warn!(%kind, "access token rejected in extractor");
            AuthError::InvalidAccessToken
        })?;

        Ok(Auth(identity))
    }
}
