// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation. Wire field names are camelCase.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::service::IssuedCredentials;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Access token obtained from the identity provider by the client.
    pub provider_credential: String,
}

/// Request body for `POST /auth/token/refresh`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Credential pair returned by both login and refresh.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Internal user id the credentials are bound to.
    pub user_id: Uuid,
    /// Short-lived signed access token.
    pub access_token: String,
    /// Rotating refresh token; replaces any previously issued value.
    pub refresh_token: String,
}

impl From<IssuedCredentials> for TokenPairResponse {
    fn from(issued: IssuedCredentials) -> Self {
        Self {
            user_id: issued.user_id,
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_uses_camel_case() {
        let request: LoginRequest =
            serde_json::from_str(r#"{"providerCredential":"kakao_token"}"#).unwrap();
        assert_eq!(request.provider_credential, "kakao_token");
    }

    #[test]
    fn token_pair_serializes_camel_case() {
        let pair = TokenPairResponse {
            user_id: Uuid::nil(),
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("userId").is_some());
    }
}
