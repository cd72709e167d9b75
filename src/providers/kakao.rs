// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Kakao user-info gateway.
//!
//! Calls the Kakao `/v2/user/me` endpoint with the client-supplied access
//! token and extracts the numeric account id. Failures are classified per
//! [`ProviderError`]; a single failed attempt is final (no retries here).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{IdentityProvider, ProviderError, RemoteIdentity};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct KakaoGateway {
    user_info_url: String,
    http: Client,
}

impl KakaoGateway {
    /// Build a gateway against the given user-info endpoint.
    ///
    /// The timeout bounds the whole request; hitting it classifies as
    /// [`ProviderError::Unavailable`].
    pub fn new(user_info_url: impl Into<String>) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            user_info_url: user_info_url.into(),
            http,
        })
    }
}

#[async_trait]
impl IdentityProvider for KakaoGateway {
    async fn resolve(&self, provider_credential: &str) -> Result<RemoteIdentity, ProviderError> {
        if provider_credential.trim().is_empty() {
            return Err(ProviderError::InvalidInput);
        }

        let response = self
            .http
            .get(&self.user_info_url)
            .bearer_auth(provider_credential)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::Unavailable(e.to_string())
                } else {
                    ProviderError::Unknown(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        parse_user_info(&body)
    }
}

fn classify_status(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
        StatusCode::FORBIDDEN => ProviderError::Forbidden,
        s if s.is_server_error() => ProviderError::Unavailable(format!("provider returned {s}")),
        s => ProviderError::Unknown(format!("provider returned {s}")),
    }
}

/// Extract the stable account id (and nickname, when present) from a
/// user-info response. Kakao sends the id as a JSON number.
fn parse_user_info(body: &Value) -> Result<RemoteIdentity, ProviderError> {
    let external_id = match body.get("id") {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(ProviderError::MalformedResponse(
                "response has no id field".to_string(),
            ))
        }
    };

    let nickname = body
        .get("properties")
        .and_then(|p| p.get("nickname"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RemoteIdentity {
        external_id,
        nickname,
    })
}
