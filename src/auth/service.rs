// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login and refresh-rotation protocols.
//!
//! Orchestrates the identity provider gateway, the user directory, and the
//! token codec. Issues a fresh access/refresh pair on every successful
//! login and on every rotation; the previously stored refresh token is
//! replaced in the same step and becomes permanently unusable.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngExt;
use uuid::Uuid;

use crate::providers::IdentityProvider;
use crate::storage::{DirectoryError, RefreshGrant, UserDirectory, UserRecord};

use super::clock::Clock;
use super::error::AuthError;
use super::token::TokenCodec;

/// Result of a successful login or rotation.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    directory: Arc<dyn UserDirectory>,
    codec: Arc<TokenCodec>,
    clock: Arc<dyn Clock>,
    refresh_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn UserDirectory>,
        codec: Arc<TokenCodec>,
        clock: Arc<dyn Clock>,
        refresh_ttl: chrono::Duration,
    ) -> Self {
        Self {
            provider,
            directory,
            codec,
            clock,
            refresh_ttl,
        }
    }

    /// Exchange a provider credential for a session credential pair.
    ///
    /// Provider failures abort before any directory access. A record is
    /// created on first login for the external identity; either way the
    /// stored refresh token is replaced, so a login invalidates refresh
    /// tokens held by other sessions of the same user.
    pub async fn login(&self, provider_credential: &str) -> Result<IssuedCredentials, AuthError> {
        let identity = self.provider.resolve(provider_credential).await?;

        let record = match self
            .directory
            .find_by_external_identity(&identity.external_id)
            .await?
        {
            Some(record) => record,
            None => {
                let record = self.directory.create(&identity.external_id).await?;
                tracing::info!(user_id = %record.id, "created user record for new external identity");
                record
            }
        };

        let grant = self.new_grant();
        let record = self
            .directory
            .save(UserRecord {
                refresh: Some(grant.clone()),
                ..record
            })
            .await?;

        let access_token = self.codec.issue(record.id)?;
        tracing::debug!(user_id = %record.id, "login issued new credential pair");

        Ok(IssuedCredentials {
            user_id: record.id,
            access_token,
            refresh_token: grant.credential,
        })
    }

    /// Exchange a refresh token for a new credential pair, single-use.
    ///
    /// The stored token is swapped out under a compare-and-swap keyed on
    /// the presented value, so of two concurrent rotations with the same
    /// token at most one succeeds; the other sees [`AuthError::RefreshInvalid`].
    pub async fn rotate(&self, refresh_credential: &str) -> Result<IssuedCredentials, AuthError> {
        if refresh_credential.trim().is_empty() {
            return Err(AuthError::RefreshMissing);
        }

        let record = self
            .directory
            .find_by_refresh_credential(refresh_credential)
            .await?
            .ok_or(AuthError::RefreshInvalid)?;

        let grant = match &record.refresh {
            Some(grant) => grant,
            None => return Err(AuthError::RefreshExpired),
        };
        if self.clock.now() > grant.expires_at {
            tracing::debug!(user_id = %record.id, "refresh token past expiry");
            return Err(AuthError::RefreshExpired);
        }

        let next = self.new_grant();
        let record = self
            .directory
            .replace_refresh_credential(record.id, Some(refresh_credential), next.clone())
            .await
            .map_err(|e| match e {
                DirectoryError::Conflict => AuthError::RefreshInvalid,
                other => other.into(),
            })?;

        let access_token = self.codec.issue(record.id)?;

        Ok(IssuedCredentials {
            user_id: record.id,
            access_token,
            refresh_token: next.credential,
        })
    }

    fn new_grant(&self) -> RefreshGrant {
        RefreshGrant {
            credential: generate_refresh_credential(),
            expires_at: self.clock.now() + self.refresh_ttl,
        }
    }
}

/// Generate an opaque refresh token: 32 random bytes, URL-safe base64.
fn generate_refresh_credential() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
