// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-token codec.
//!
//! Issues and validates the short-lived signed access token (HS256 JWT
//! carrying `sub`/`iat`/`exp`). Stateless: tokens are never stored, a
//! token is valid iff its signature verifies and it has not expired.
//!
//! Expiry is checked against the injected [`Clock`] rather than the
//! library's system-time check, so an expired token is always reported as
//! [`TokenError::Expired`] and tests can pin `now`.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::Clock;
use super::identity::AuthenticatedIdentity;

/// Validation failure kinds for attacker-controlled token input.
///
/// Every parse or verification failure maps to one of these; junk input
/// never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The string is not a well-formed signed token.
    #[error("token is malformed")]
    Malformed,
    /// Signature verified but the token is past its expiry.
    #[error("token has expired")]
    Expired,
    /// Wrong signature, wrong algorithm, or any other verification failure.
    #[error("token is invalid")]
    Invalid,
    /// Issuance-side signing failure. Never produced by `validate`.
    #[error("token signing failed")]
    Signing,
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    /// Internal user id.
    sub: String,
    /// Issued-at, seconds since epoch.
    iat: i64,
    /// Expiry, seconds since epoch.
    exp: i64,
}

/// Issues and validates access tokens with a process-wide HS256 key.
///
/// Constructed once at startup; immutable thereafter and shared via `Arc`.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl: chrono::Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            clock,
        }
    }

    /// Issue a signed access token for `subject`.
    ///
    /// `iat = now`, `exp = now + access_ttl`. Pure computation, no I/O.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = self.clock.now().timestamp();
        let claims = AccessClaims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.access_ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|_| TokenError::Signing)
    }

    /// Validate a bearer token string and return the identity it proves.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedIdentity, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is decided below against the injected clock.
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::InvalidToken
                | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if self.clock.now().timestamp() > data.claims.exp {
            return Err(TokenError::Expired);
        }

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)?;

        Ok(AuthenticatedIdentity {
            user_id,
            expires_at: data.claims.exp,
        })
    }
}
