// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The single failure taxonomy crossing the service/API boundary. Each
//! variant carries an explicit HTTP status mapping; responses use the
//! common `{success, data, error}` envelope with `error.code` equal to
//! the status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiResponse;
use crate::providers::ProviderError;
use crate::storage::DirectoryError;

use super::token::TokenError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header on the request.
    MissingCredentials,
    /// The presented access token failed validation. Collapses all
    /// [`TokenError`] kinds; the specific kind is logged, never surfaced.
    InvalidAccessToken,
    /// Refresh token absent from the request body.
    RefreshMissing,
    /// Refresh token unknown: never issued, or already rotated away.
    RefreshInvalid,
    /// Refresh token known but past its expiry.
    RefreshExpired,
    /// Identity provider failure during login, classified.
    Provider(ProviderError),
    /// Unclassified fault. The detail is logged; the client sees a fixed
    /// message.
    Internal(String),
}

impl AuthError {
    /// HTTP status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidAccessToken
            | AuthError::RefreshMissing
            | AuthError::RefreshInvalid
            | AuthError::RefreshExpired => StatusCode::UNAUTHORIZED,
            AuthError::Provider(e) => match e {
                ProviderError::InvalidInput => StatusCode::BAD_REQUEST,
                ProviderError::Unauthorized => StatusCode::UNAUTHORIZED,
                ProviderError::Forbidden => StatusCode::FORBIDDEN,
                ProviderError::Unavailable(_) | ProviderError::MalformedResponse(_) => {
                    StatusCode::BAD_GATEWAY
                }
                ProviderError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-facing message. Distinguishes recoverable refresh failures,
    /// but never token-validation internals.
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => {
                "Authorization header is missing or malformed (expected 'Bearer <token>')"
            }
            AuthError::InvalidAccessToken => "Access token is expired or invalid",
            AuthError::RefreshMissing => "Refresh token is required",
            AuthError::RefreshInvalid => "Refresh token is not valid",
            AuthError::RefreshExpired => "Refresh token has expired",
            AuthError::Provider(e) => match e {
                ProviderError::InvalidInput => "Provider credential is required",
                ProviderError::Unauthorized => "Identity provider rejected the credential",
                ProviderError::Forbidden => "Identity provider denied access",
                ProviderError::Unavailable(_) => "Identity provider is unavailable",
                ProviderError::MalformedResponse(_) => "Identity provider returned an unusable response",
                ProviderError::Unknown(_) => "Internal server error",
            },
            AuthError::Internal(_) => "Internal server error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

impl From<ProviderError> for AuthError {
    fn from(e: ProviderError) -> Self {
        AuthError::Provider(e)
    }
}

impl From<DirectoryError> for AuthError {
    fn from(e: DirectoryError) -> Self {
        match e {
            // A lost compare-and-swap means the presented refresh token is
            // no longer the current one.
            DirectoryError::Conflict => AuthError::RefreshInvalid,
            DirectoryError::NotFound | DirectoryError::Storage(_) => {
                AuthError::Internal(e.to_string())
            }
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing => AuthError::Internal("token signing failed".to_string()),
            TokenError::Malformed | TokenError::Expired | TokenError::Invalid => {
                AuthError::InvalidAccessToken
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "authentication failed with server-side fault");
        }
        let body = Json(ApiResponse::fail(status.as_u16(), self.message()));
        (status, body).into_response()
    }
}
