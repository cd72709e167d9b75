// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider gateway.
//!
//! Resolves the opaque credential a client obtained from the third-party
//! provider into a stable external identity id. The login flow treats any
//! failure here as final: no user record is read or written.

pub mod kakao;

use async_trait::async_trait;

pub use kakao::KakaoGateway;

/// Stable identity returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    /// Provider-scoped unique identifier, persisted on the user record.
    pub external_id: String,
    /// Display name, when the provider shares one. Informational only.
    pub nickname: Option<String>,
}

/// Classified gateway failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Credential was empty or unusable; detected before any network call.
    #[error("provider credential is missing or malformed")]
    InvalidInput,

    /// The provider rejected the credential (expired or invalid).
    #[error("identity provider rejected the credential")]
    Unauthorized,

    /// The provider denied the requested scope.
    #[error("identity provider denied access")]
    Forbidden,

    /// Network failure, timeout, or provider 5xx.
    #[error("identity provider is unavailable: {0}")]
    Unavailable(String),

    /// Provider answered but the identity field is missing or unreadable.
    #[error("identity provider returned an unusable response: {0}")]
    MalformedResponse(String),

    /// Anything else.
    #[error("identity provider request failed: {0}")]
    Unknown(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a provider credential to the external identity it belongs to.
    async fn resolve(&self, provider_credential: &str) -> Result<RemoteIdentity, ProviderError>;
}

/// Provider stub for service- and router-level tests.
#[cfg(test)]
pub struct StubProvider {
    pub response: Result<RemoteIdentity, ProviderError>,
}

#[cfg(test)]
impl StubProvider {
    pub fn returning(external_id: &str) -> Self {
        Self {
            response: Ok(RemoteIdentity {
                external_id: external_id.to_string(),
                nickname: None,
            }),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl IdentityProvider for StubProvider {
    async fn resolve(&self, _provider_credential: &str) -> Result<RemoteIdentity, ProviderError> {
        self.response.clone()
    }
}
